//! Principal domain entities.

pub mod directory;
pub mod model;
pub mod role;
pub mod view;

pub use directory::PrincipalDirectory;
pub use model::Principal;
pub use role::Role;
pub use view::PrincipalView;
