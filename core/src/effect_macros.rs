//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block body
///
/// The body must evaluate to `Option<Action>`. Captured values are moved
/// into the future.
///
/// # Example
///
/// ```rust,ignore
/// use recall_core::async_effect;
///
/// let users = Arc::clone(&env.users);
/// async_effect! {
///     let result = users.fetch_user(1).await;
///     Some(AppAction::UserLoaded { result })
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

#[cfg(test)]
mod tests {
    use crate::effect::Effect;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Loaded { value: i32 },
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::Loaded { value: 42 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[tokio::test]
    async fn test_async_effect_moves_captures() {
        let value = 7;
        let effect = async_effect! {
            Some(TestAction::Loaded { value })
        };

        let Effect::Future(fut) = effect else {
            unreachable!("async_effect! always builds a future");
        };
        assert_eq!(fut.await, Some(TestAction::Loaded { value: 7 }));
    }
}
