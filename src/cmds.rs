mod demo;
mod inspect;
mod shell;

pub use self::demo::*;
pub use self::inspect::*;
pub use self::shell::*;
