use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tonic::Status;

/// A type-erased async callback.
///
/// Every registered handler is boxed into this shape so that handlers with
/// different closure and future types can live in the same map.
pub type HandlerFn<Req, Resp> =
    Arc<dyn Fn(Req) -> BoxFuture<'static, Result<Resp, Status>> + Send + Sync + 'static>;

/// Box an async closure into a [`HandlerFn`].
///
/// The closure may return anything convertible into the response type, so a
/// method handler can return a `String` and a topic handler can return `()`.
pub fn make_handler<Req, Resp, R, F, Fut>(f: F) -> HandlerFn<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
    R: Into<Resp> + Send + 'static,
    F: Fn(Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Status>> + Send + 'static,
{
    Arc::new(move |request| {
        let fut = f(request);
        Box::pin(async move { fut.await.map(Into::into) })
    })
}

/// Run a handler, turning a panic anywhere inside it into `Status::internal`.
pub(crate) async fn call_guarded<Req, Resp>(
    handler: &HandlerFn<Req, Resp>,
    request: Req,
) -> Result<Resp, Status> {
    // The closure itself may panic before a future exists.
    let fut = match std::panic::catch_unwind(AssertUnwindSafe(|| handler(request))) {
        Ok(fut) => fut,
        Err(_) => return Err(handler_panicked()),
    };

    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(_) => Err(handler_panicked()),
    }
}

fn handler_panicked() -> Status {
    tracing::error!("Handler panicked");
    Status::internal("handler panicked")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[tokio::test]
    async fn test_converts_return_value() {
        let handler: HandlerFn<u32, String> =
            make_handler(|n: u32| async move { Ok::<_, Status>(format!("n={n}")) });
        let result = call_guarded(&handler, 7).await.unwrap();
        assert_eq!(result, "n=7");
    }

    #[tokio::test]
    async fn test_status_propagates() {
        let handler: HandlerFn<(), ()> =
            make_handler(|_: ()| async { Err::<(), _>(Status::not_found("missing")) });
        let status = call_guarded(&handler, ()).await.unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "missing");
    }

    #[tokio::test]
    async fn test_panic_inside_future_is_caught() {
        let handler: HandlerFn<(), ()> = make_handler(|_: ()| async {
            if true {
                panic!("boom");
            }
            Ok::<(), Status>(())
        });
        let status = call_guarded(&handler, ()).await.unwrap_err();
        assert_eq!(status.code(), Code::Internal);
    }

    #[tokio::test]
    async fn test_panic_before_future_is_caught() {
        let handler: HandlerFn<(), ()> = Arc::new(|_: ()| -> BoxFuture<'static, Result<(), Status>> {
            panic!("eager boom")
        });
        let status = call_guarded(&handler, ()).await.unwrap_err();
        assert_eq!(status.code(), Code::Internal);
    }
}
