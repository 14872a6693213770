/// 输出到浏览器控制台；非 wasm 目标下不输出。
macro_rules! log {
    ($($t:tt)*) => {
        $crate::utils::console_log(&format!($($t)*))
    };
}

pub(crate) use log;

pub fn console_log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
pub fn set_panic_hook() {}
