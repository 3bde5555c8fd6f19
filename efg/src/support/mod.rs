mod cursor;
mod support;

pub use self::cursor::ActionCursor;
pub use self::support::Support;
