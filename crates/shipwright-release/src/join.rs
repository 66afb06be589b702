//! Fail-fast fan-out

use std::future::Future;

use futures::future::try_join_all;

/// Wait for every future; the first error wins and the rest are dropped.
///
/// Results keep the order of `futures`.
pub async fn join_all_or_fail<I, F, T, E>(futures: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    try_join_all(futures).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::{pending, BoxFuture, FutureExt};
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let futures: Vec<BoxFuture<'static, Result<u32, String>>> = vec![
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(1)
            }
            .boxed(),
            async { Ok(2) }.boxed(),
        ];

        assert_eq!(join_all_or_fail(futures).await.unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_first_error_aborts_without_waiting() {
        let futures: Vec<BoxFuture<'static, Result<u32, String>>> = vec![
            pending().boxed(),
            async { Ok(2) }.boxed(),
            async { Err("boom".to_string()) }.boxed(),
        ];

        let result = tokio::time::timeout(Duration::from_secs(5), join_all_or_fail(futures))
            .await
            .expect("join should not wait for pending futures");
        assert_eq!(result.unwrap_err(), "boom");
    }

    #[tokio::test]
    async fn test_empty_input() {
        let futures: Vec<BoxFuture<'static, Result<u32, String>>> = Vec::new();
        assert!(join_all_or_fail(futures).await.unwrap().is_empty());
    }
}
