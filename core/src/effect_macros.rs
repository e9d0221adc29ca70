//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// The block must evaluate to `Option<Action>`; `Some` is fed back into the
/// reducer by the runtime.
///
/// # Example
///
/// ```rust,ignore
/// use registration_core::async_effect;
///
/// async_effect! {
///     match resolver.submit(&context, &selection).await {
///         Ok(registration) => Some(RegistrationAction::SubmissionRecorded(registration)),
///         Err(error) => Some(RegistrationAction::SubmissionFailed(error.to_string())),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
