use anyhow::Result;
use dapr_sdk::ext_grpc::{
    App, AppConfig, BindingRequest, InvokeMethodRequest, Rule, SubscribeOptions, TopicEvent,
    TopicEventResponse,
};
use dapr_sdk::serializers::duration;
use tonic::Status;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app = App::with_config(AppConfig::from_env()?);

    app.method("say_hello", |req: InvokeMethodRequest| async move {
        let name = req.text().unwrap_or("stranger").to_string();
        Ok::<_, Status>(format!("{{\"greeting\":\"hello {name}\"}}"))
    })?;

    // Echoes back the reminder period, normalized.
    app.method("normalize_period", |req: InvokeMethodRequest| async move {
        let text = req.text().unwrap_or_default();
        let period = duration::decode(text).map_err(|e| Status::invalid_argument(e.to_string()))?;
        Ok::<_, Status>(duration::encode(period))
    })?;

    app.binding("cron", |req: BindingRequest| async move {
        info!(binding = %req.name, "Cron fired");
        Ok::<_, Status>(())
    })?;

    app.subscribe(SubscribeOptions::new("pubsub", "orders"), |event: TopicEvent| async move {
        info!(id = %event.id, "Order received on default route");
        Ok::<_, Status>(())
    })?;

    app.subscribe(
        SubscribeOptions::builder()
            .pubsub_name("pubsub")
            .topic("orders")
            .rule(Rule::new("event.type == \"cancelled\"", 1))
            .route("cancelled")
            .build(),
        |event: TopicEvent| async move {
            warn!(id = %event.id, "Dropping cancelled order");
            Ok::<_, Status>(TopicEventResponse::Drop)
        },
    )?;

    let servicer = app.servicer();

    let response = servicer
        .on_invoke("say_hello", InvokeMethodRequest::new("dapr", "text/plain"))
        .await?;
    info!(body = ?response.text(), content_type = %response.content_type, "say_hello replied");

    let response = servicer
        .on_invoke("normalize_period", InvokeMethodRequest::new("90m", "text/plain"))
        .await?;
    info!(body = ?response.text(), "normalize_period replied");

    servicer
        .on_binding_event(BindingRequest::new("cron", ""))
        .await?;

    let outcome = servicer
        .on_topic_event(
            TopicEvent::builder()
                .id("order-1")
                .pubsub_name("pubsub")
                .topic("orders")
                .event_type("cancelled")
                .path("cancelled")
                .build(),
        )
        .await?;
    info!(outcome = ?outcome, "Topic event handled");

    for subscription in servicer.list_topic_subscriptions() {
        info!(
            pubsub_name = %subscription.pubsub_name,
            topic = %subscription.topic,
            rules = subscription.routes.rules.len(),
            "Subscription"
        );
    }

    if let Err(status) = servicer
        .on_invoke("missing", InvokeMethodRequest::default())
        .await
    {
        warn!(code = ?status.code(), message = %status.message(), "Expected failure");
    }

    Ok(())
}
