//! Entry point for the trunk-built bundle.

fn main() {
    // Set the panic hook to log detailed errors to the console
    console_error_panic_hook::set_once();
    panel_ui::start();
}
