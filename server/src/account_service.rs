use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;
use uuid::Uuid;

use cirrus_shared::account::{
    email_is_valid, name_is_valid, password_is_valid, Identity,
};
use cirrus_shared::api::{
    ChangeNameError, ChangeNameRequest, ChangeNameResponse, ChangePasswordError,
    ChangePasswordRequest, GetMeError, GetMeRequest, LoginError, LoginRequest, SignupError,
    SignupRequest,
};
use cirrus_shared::clock::get_time;
use cirrus_shared::tier::SubscriptionTier;

use crate::schema::Account;
use crate::{ClientError, RequestContext, ServerError, ServerState};

/// PHC-formatted argon2id hash; the salt rides inside the string.
fn hash_password<T: std::fmt::Debug>(password: &str) -> Result<String, ServerError<T>> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| internal!("Failed to hash password: {:?}", err))
}

fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            error!("Stored password hash failed to parse: {:?}", err);
            false
        }
    }
}

pub async fn signup(
    server_state: &ServerState, request: SignupRequest,
) -> Result<(Identity, String), ServerError<SignupError>> {
    if !name_is_valid(&request.name)
        || !email_is_valid(&request.email)
        || !password_is_valid(&request.password)
    {
        return Err(ClientError(SignupError::InvalidInput));
    }
    if request.password != request.confirm_password {
        return Err(ClientError(SignupError::PasswordsDontMatch));
    }

    let email = request.email.trim().to_lowercase();
    let name = request.name.trim().to_string();

    if server_state.index_db.emails.get(&email)?.is_some() {
        return Err(ClientError(SignupError::EmailTaken));
    }

    let password_hash = hash_password(&request.password)?;

    // the payment processor learns about the customer up front so checkout
    // later has someone to bill
    let stripe_customer_id = match &server_state.stripe_client {
        Some(client) => Some(create_stripe_customer(client, &name, &email).await?),
        None => None,
    };

    let account = Account {
        id: Uuid::new_v4(),
        name,
        email: email.clone(),
        password_hash,
        tier: SubscriptionTier::Free,
        stripe_customer_id,
        created_at: get_time(),
    };

    let inserted = server_state.index_db.transaction(|tx| {
        if tx.emails.get(&email).is_some() {
            return false;
        }
        tx.emails.insert(email.clone(), account.id);
        tx.accounts.insert(account.id, account.clone());
        tx.owned_files.insert(account.id, vec![]);
        true
    })?;
    if !inserted {
        // lost the race after the stripe call; the orphaned customer is
        // harmless and unbilled
        warn!(%email, "signup raced a concurrent signup for the same email");
        return Err(ClientError(SignupError::EmailTaken));
    }

    info!(user_id = %account.id, "account created");

    let token = server_state.sessions.create(&account);
    Ok((identity_of(&account), token))
}

pub async fn login(
    server_state: &ServerState, request: LoginRequest,
) -> Result<(Identity, String), ServerError<LoginError>> {
    if !email_is_valid(&request.email) || !password_is_valid(&request.password) {
        return Err(ClientError(LoginError::InvalidInput));
    }

    let email = request.email.trim().to_lowercase();
    let user_id = server_state
        .index_db
        .emails
        .get(&email)?
        .ok_or(ClientError(LoginError::UserNotFound))?;
    let account = server_state
        .index_db
        .accounts
        .get(&user_id)?
        .ok_or_else(|| internal!("email index points at a missing account: {}", user_id))?;

    if !verify_password(&request.password, &account.password_hash) {
        return Err(ClientError(LoginError::InvalidPassword));
    }

    info!(%user_id, "login");

    let token = server_state.sessions.create(&account);
    Ok((identity_of(&account), token))
}

/// Always succeeds; revoking an absent session is a no-op.
pub fn logout(server_state: &ServerState, token: Option<&str>) {
    if let Some(token) = token {
        server_state.sessions.revoke(token);
    }
}

pub async fn get_me(
    context: RequestContext<'_, GetMeRequest>,
) -> Result<Identity, ServerError<GetMeError>> {
    let account = context
        .server_state
        .index_db
        .accounts
        .get(&context.session.user_id)?
        .ok_or(ClientError(GetMeError::UserNotFound))?;
    Ok(identity_of(&account))
}

pub async fn change_name(
    context: RequestContext<'_, ChangeNameRequest>,
) -> Result<ChangeNameResponse, ServerError<ChangeNameError>> {
    let (request, server_state) = (&context.request, context.server_state);

    if !name_is_valid(&request.new_name) {
        return Err(ClientError(ChangeNameError::InvalidInput));
    }
    if !context.caller_owns(request.user_id) {
        return Err(ClientError(ChangeNameError::NotPermitted));
    }

    let new_name = request.new_name.trim().to_string();

    let mut account = server_state
        .index_db
        .accounts
        .get(&request.user_id)?
        .ok_or(ClientError(ChangeNameError::UserNotFound))?;

    if account.name == new_name {
        return Err(ClientError(ChangeNameError::NameUnchanged));
    }

    account.name = new_name.clone();
    server_state
        .index_db
        .accounts
        .insert(account.id, account)?;

    // live sessions keep rendering the old name otherwise
    let propagated = new_name.clone();
    server_state
        .sessions
        .update_sessions(request.user_id, move |session| session.name = propagated.clone());

    info!(user_id = %request.user_id, "display name changed");

    Ok(ChangeNameResponse { name: new_name })
}

pub async fn change_password(
    context: RequestContext<'_, ChangePasswordRequest>,
) -> Result<(), ServerError<ChangePasswordError>> {
    let (request, server_state) = (&context.request, context.server_state);

    if !password_is_valid(&request.new_password) {
        return Err(ClientError(ChangePasswordError::InvalidInput));
    }
    if request.new_password != request.confirm_new_password {
        return Err(ClientError(ChangePasswordError::PasswordsDontMatch));
    }
    if !context.caller_owns(request.user_id) {
        return Err(ClientError(ChangePasswordError::NotPermitted));
    }

    let mut account = server_state
        .index_db
        .accounts
        .get(&request.user_id)?
        .ok_or(ClientError(ChangePasswordError::UserNotFound))?;

    if !verify_password(&request.current_password, &account.password_hash) {
        return Err(ClientError(ChangePasswordError::WrongCurrentPassword));
    }

    account.password_hash = hash_password(&request.new_password)?;
    server_state
        .index_db
        .accounts
        .insert(account.id, account)?;

    info!(user_id = %request.user_id, "password changed");

    Ok(())
}

async fn create_stripe_customer<T: std::fmt::Debug>(
    client: &stripe::Client, name: &str, email: &str,
) -> Result<String, ServerError<T>> {
    let mut params = stripe::CreateCustomer::new();
    params.name = Some(name);
    params.email = Some(email);

    let customer = stripe::Customer::create(client, params)
        .await
        .map_err(|err| internal!("Failed to create stripe customer: {:?}", err))?;

    Ok(customer.id.to_string())
}

pub fn identity_of(account: &Account) -> Identity {
    Identity {
        id: account.id,
        name: account.name.clone(),
        email: account.email.clone(),
        tier: account.tier,
    }
}
