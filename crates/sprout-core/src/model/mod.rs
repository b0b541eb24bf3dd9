pub mod item;
pub mod lifecycle;
pub mod sprout;
pub mod user;

pub use item::{Affirmation, ChildKind, ListItem, Trigger};
pub use lifecycle::{Entity, Lifecycle, SyncStatus};
pub use sprout::{Sprout, SproutProps, DEFAULT_COLOR, DEFAULT_HAT_ID, DEFAULT_SHAPE_ID};
pub use user::{AuthProfile, User, UserProps};
