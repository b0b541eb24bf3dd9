//! Embedded SQL migrations
//!
//! Migrations are embedded at compile time using include_str!. A step's
//! identity is its index in this list: append only, never reorder.

use super::runner::MigrationStep;

/// All schema steps in order
pub fn schema_steps() -> Vec<MigrationStep> {
    vec![
        MigrationStep::sql("001_users", include_str!("../../migrations/001_users.sql")),
        MigrationStep::sql("002_sprouts", include_str!("../../migrations/002_sprouts.sql")),
        MigrationStep::sql(
            "003_affirmations",
            include_str!("../../migrations/003_affirmations.sql"),
        ),
        MigrationStep::sql("004_triggers", include_str!("../../migrations/004_triggers.sql")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        let names: Vec<&str> = schema_steps().iter().map(MigrationStep::name).collect();
        assert_eq!(
            names,
            vec!["001_users", "002_sprouts", "003_affirmations", "004_triggers"]
        );
    }
}
