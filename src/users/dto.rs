use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub mobile_no: String,
    #[serde(default)]
    pub building_no: String,
    #[serde(default)]
    pub room_no: String,
    #[serde(default)]
    pub role: String,
    pub plan: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAddressRequest {
    pub building_no: String,
    pub room_no: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    pub plan: String,
}

pub fn is_valid_plan(plan: &str) -> bool {
    plan == "monthly" || plan == "one_off"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_values() {
        assert!(is_valid_plan("monthly"));
        assert!(is_valid_plan("one_off"));
        assert!(!is_valid_plan("weekly"));
        assert!(!is_valid_plan(""));
    }
}
