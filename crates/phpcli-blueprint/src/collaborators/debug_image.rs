/// Derives the debug-instrumented variant of a PHP image.
pub trait DebugImageBuilder: Send + Sync {
    fn debug_image(&self, image: &str, xdebug_version: &str) -> String;
}

/// `php:7.0-alpine` + xdebug `2.5.5` → `php:7.0-alpine-xdebug2.5.5`
#[derive(Debug, Default)]
pub struct XdebugImageBuilder;

impl DebugImageBuilder for XdebugImageBuilder {
    fn debug_image(&self, image: &str, xdebug_version: &str) -> String {
        format!("{image}-xdebug{xdebug_version}")
    }
}
