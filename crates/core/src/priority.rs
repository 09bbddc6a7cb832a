//! Task priority values.

pub const PRIORITY_LOW: &str = "low";
pub const PRIORITY_NORMAL: &str = "normal";
pub const PRIORITY_HIGH: &str = "high";

pub const PRIORITIES: &[&str] = &[PRIORITY_LOW, PRIORITY_NORMAL, PRIORITY_HIGH];

pub fn is_valid_priority(priority: &str) -> bool {
    PRIORITIES.contains(&priority)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_priorities() {
        assert!(is_valid_priority("high"));
        assert!(is_valid_priority("normal"));
        assert!(!is_valid_priority("urgent"));
    }
}
