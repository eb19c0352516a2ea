pub mod controller;
pub mod format;
pub mod render;
pub mod settings;
pub mod view;

pub use controller::{Alert, Dashboard};
pub use settings::{FilePreferenceStore, PreferenceStore, Theme, ThemeSettings};
pub use view::{RequestKind, RequestTicket, Transition, View, ViewMachine};
