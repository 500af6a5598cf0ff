pub mod build;
pub mod compdb;
pub mod configure;
pub mod emit;
pub mod install;

pub use build::build;
pub use configure::configure;
pub use install::install;
