use sprout_core::{ListItem, Sprout, SproutLimits};

pub const TEST_USER_ID: &str = "user-123";

/// Fresh Sprout with default limits
#[allow(dead_code)]
pub fn new_sprout() -> Sprout {
    Sprout::create_new(TEST_USER_ID, SproutLimits::default())
}

/// Fresh Sprout with explicit caps
#[allow(dead_code)]
pub fn new_sprout_with_limits(max_affirmations: usize, max_triggers: usize) -> Sprout {
    Sprout::create_new(
        TEST_USER_ID,
        SproutLimits::new(max_affirmations, max_triggers),
    )
}

#[allow(dead_code)]
pub fn texts(items: &[ListItem]) -> Vec<String> {
    items.iter().map(|item| item.text().to_string()).collect()
}

#[allow(dead_code)]
pub fn positions(items: &[ListItem]) -> Vec<u32> {
    items.iter().map(ListItem::position).collect()
}
