//! Browser console plumbing: `log` output and a panic hook.

use log::Level;

/// Route `log` output to the console. Later calls are ignored.
pub fn init_logger(level: Level) {
    if console_log::init_with_level(level).is_err() {
        log::debug!("console logger already installed");
    }
}

/// Parse a level name from the host (`"debug"`, `"warn"`, ...).
pub fn parse_level(name: &str) -> Level {
    name.parse().unwrap_or(Level::Warn)
}

pub fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("annotator WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(parse_level("debug"), Level::Debug);
        assert_eq!(parse_level("TRACE"), Level::Trace);
        assert_eq!(parse_level("loud"), Level::Warn);
        assert_eq!(parse_level("off"), Level::Warn);
    }
}
