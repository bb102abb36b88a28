use std::collections::HashMap;

use warp::hyper::body::Bytes;

use cirrus_shared::api::{CheckoutError, CheckoutRequest, CheckoutResponse};
use cirrus_shared::clock::get_time;
use cirrus_shared::tier::SubscriptionTier;

use crate::schema::{CheckoutRecord, CheckoutStatus};
use crate::{ClientError, RequestContext, ServerError, ServerState};

#[derive(Debug)]
pub enum StripeWebhookError {
    InvalidHeader(String),
    InvalidBody(String),
    ParseError(String),
}

/// Start a subscription-tier change: a hosted checkout session the client
/// redirects into, plus a pending audit record the webhook later completes.
pub async fn create_checkout(
    context: RequestContext<'_, CheckoutRequest>,
) -> Result<CheckoutResponse, ServerError<CheckoutError>> {
    let (request, server_state) = (&context.request, context.server_state);

    if !request.success_url.starts_with("http") || !request.cancel_url.starts_with("http") {
        return Err(ClientError(CheckoutError::InvalidInput));
    }
    if request.tier == SubscriptionTier::Free {
        return Err(ClientError(CheckoutError::TierNotPurchasable));
    }

    let account = server_state
        .index_db
        .accounts
        .get(&context.session.user_id)?
        .ok_or(ClientError(CheckoutError::UserNotFound))?;

    if account.tier == request.tier {
        return Err(ClientError(CheckoutError::AlreadySubscribed));
    }

    let stripe_client = server_state
        .stripe_client
        .as_ref()
        .ok_or_else(|| internal!("checkout requested but billing is not configured"))?;
    let billing = server_state
        .config
        .billing
        .as_ref()
        .ok_or_else(|| internal!("stripe client exists without billing config"))?;

    let price_id = match request.tier {
        SubscriptionTier::Pro => billing.pro_price_id.clone(),
        SubscriptionTier::Premium => billing.premium_price_id.clone(),
        SubscriptionTier::Free => unreachable!("checked above"),
    };

    info!(user_id = %account.id, tier = %request.tier, "creating checkout session");

    let success_url = format!("{}?session_id={{CHECKOUT_SESSION_ID}}", request.success_url);
    let cancel_url = format!("{}?session_id={{CHECKOUT_SESSION_ID}}", request.cancel_url);

    let mut params = stripe::CreateCheckoutSession::new();
    params.success_url = Some(&success_url);
    params.cancel_url = Some(&cancel_url);
    params.mode = Some(stripe::CheckoutSessionMode::Subscription);
    params.customer_email = Some(&account.email);
    params.line_items = Some(vec![stripe::CreateCheckoutSessionLineItems {
        price: Some(price_id),
        quantity: Some(1),
        ..Default::default()
    }]);
    params.metadata = Some(HashMap::from([
        ("user_id".to_string(), account.id.to_string()),
        ("tier".to_string(), request.tier.to_string()),
    ]));

    let checkout = stripe::CheckoutSession::create(stripe_client, params)
        .await
        .map_err(|err| internal!("Failed to create checkout session: {:?}", err))?;

    let url = checkout
        .url
        .clone()
        .ok_or_else(|| internal!("checkout session {} carries no redirect url", checkout.id))?;

    server_state.index_db.checkout_sessions.insert(
        checkout.id.to_string(),
        CheckoutRecord {
            session_id: checkout.id.to_string(),
            user_id: account.id,
            tier: request.tier,
            amount_cents: checkout.amount_total.unwrap_or_default(),
            status: CheckoutStatus::Pending,
            created_at: get_time(),
        },
    )?;

    Ok(CheckoutResponse { url })
}

pub fn verify_request_and_get_event(
    server_state: &ServerState, request_body: &Bytes, stripe_sig: &str,
) -> Result<stripe::WebhookEvent, ServerError<StripeWebhookError>> {
    let billing = server_state
        .config
        .billing
        .as_ref()
        .ok_or_else(|| internal!("webhook received but billing is not configured"))?;

    let payload = std::str::from_utf8(request_body).map_err(|e| {
        ClientError(StripeWebhookError::InvalidBody(format!("Cannot get body as str: {:?}", e)))
    })?;

    info!("Verifying a stripe webhook request.");

    Ok(stripe::Webhook::construct_event(payload, stripe_sig, &billing.signing_secret)?)
}

/// The payment-processor event sink. Signature failures are the caller's
/// 400; unrecognized event types are acknowledged and dropped.
pub async fn handle_webhook(
    server_state: &ServerState, request_body: Bytes, stripe_sig: Option<String>,
) -> Result<(), ServerError<StripeWebhookError>> {
    let stripe_sig = stripe_sig.ok_or(ClientError(StripeWebhookError::InvalidHeader(
        "Missing stripe signature".to_string(),
    )))?;

    let event = verify_request_and_get_event(server_state, &request_body, &stripe_sig)?;

    match event.event_type {
        stripe::EventType::CheckoutSessionCompleted => {
            if let stripe::EventObject::CheckoutSession(checkout) = event.data.object {
                complete_checkout(server_state, checkout.id.as_str())?;
            }
        }
        stripe::EventType::CheckoutSessionExpired => {
            if let stripe::EventObject::CheckoutSession(checkout) = event.data.object {
                cancel_checkout(server_state, checkout.id.as_str())?;
            }
        }
        other => {
            debug!(event_type = ?other, "ignoring webhook event");
        }
    }

    Ok(())
}

fn complete_checkout(
    server_state: &ServerState, session_id: &str,
) -> Result<(), ServerError<StripeWebhookError>> {
    let record = match server_state.index_db.checkout_sessions.get(&session_id.to_string())? {
        Some(record) => record,
        None => {
            warn!(%session_id, "completed checkout for an unknown session");
            return Ok(());
        }
    };

    let tier = record.tier;
    let user_id = record.user_id;

    server_state.index_db.transaction(|tx| {
        if let Some(account) = tx.accounts.get(&user_id) {
            let mut account = account.clone();
            account.tier = tier;
            tx.accounts.insert(user_id, account);
        }
        let mut record = record.clone();
        record.status = CheckoutStatus::Completed;
        tx.checkout_sessions.insert(session_id.to_string(), record);
    })?;

    // anyone already logged in sees the new cap without a fresh login
    server_state
        .sessions
        .update_sessions(user_id, move |session| session.tier = tier);

    info!(%user_id, %tier, "subscription upgraded");

    Ok(())
}

fn cancel_checkout(
    server_state: &ServerState, session_id: &str,
) -> Result<(), ServerError<StripeWebhookError>> {
    if let Some(mut record) = server_state.index_db.checkout_sessions.get(&session_id.to_string())? {
        record.status = CheckoutStatus::Cancelled;
        server_state
            .index_db
            .checkout_sessions
            .insert(session_id.to_string(), record)?;
        info!(%session_id, "checkout session expired");
    }
    Ok(())
}
