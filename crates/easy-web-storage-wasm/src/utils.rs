pub fn set_panic_hook() {
    // Routes Rust panics to `console.error` with a readable message.
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
