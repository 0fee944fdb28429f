/// Logs a positive outcome.
///
/// Emits an `INFO` event on the `subrefine::success` target so terminal
/// formatters can style it apart from regular progress messages.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "subrefine::success", $($arg)*)
    };
}
