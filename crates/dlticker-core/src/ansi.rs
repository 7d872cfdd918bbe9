//! ANSI escape sequences used by the live frame. Byte-exact; terminals depend on them.

pub const ESCAPE: &str = "\x1b";
pub const RESET: &str = "\x1b[0m";
/// Clear from the cursor to the end of the line.
pub const KILL_LINE: &str = "\x1b[K";

pub const F_DRED: &str = "\x1b[31m";
pub const F_LRED: &str = "\x1b[31;1m";
pub const F_DGREEN: &str = "\x1b[32m";
pub const F_LGREEN: &str = "\x1b[32;1m";
pub const F_BROWN: &str = "\x1b[33m";
pub const F_YELLOW: &str = "\x1b[33;1m";
pub const F_DBLUE: &str = "\x1b[34m";
pub const F_LBLUE: &str = "\x1b[34;1m";
pub const F_DMAGENTA: &str = "\x1b[35m";
pub const F_LMAGENTA: &str = "\x1b[35;1m";
pub const F_DCYAN: &str = "\x1b[36m";
pub const F_LCYAN: &str = "\x1b[36;1m";
pub const F_WHITE: &str = "\x1b[37m";
pub const F_BWHITE: &str = "\x1b[37;1m";

/// `ESC[<n>A`: move the cursor up `n` lines.
pub fn cursor_up(n: usize) -> String {
    format!("{ESCAPE}[{n}A")
}
