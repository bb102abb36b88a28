use cirrus_shared::account::Identity;
use cirrus_shared::api::{
    ChangeNameRequest, ChangePasswordRequest, GetMeRequest, LoginRequest, LogoutRequest,
    SignupRequest,
};

use crate::io::network::Requester;
use crate::model::errors::{CoreErrKind, CoreResult};
use crate::service::uploads::Transfer;
use crate::CirrusLib;

impl<Client: Requester, Store: Transfer> CirrusLib<Client, Store> {
    #[instrument(level = "info", skip(self, password, confirm_password), err(Debug))]
    pub async fn signup(
        &self, name: &str, email: &str, password: &str, confirm_password: &str,
    ) -> CoreResult<Identity> {
        let identity = self
            .client
            .request(SignupRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                confirm_password: confirm_password.to_string(),
            })
            .await?;
        *self.session.lock().expect("session cache poisoned") = Some(identity.clone());
        Ok(identity)
    }

    #[instrument(level = "info", skip(self, password), err(Debug))]
    pub async fn login(&self, email: &str, password: &str) -> CoreResult<Identity> {
        let identity = self
            .client
            .request(LoginRequest { email: email.to_string(), password: password.to_string() })
            .await?;
        *self.session.lock().expect("session cache poisoned") = Some(identity.clone());
        Ok(identity)
    }

    #[instrument(level = "info", skip_all, err(Debug))]
    pub async fn logout(&self) -> CoreResult<()> {
        self.client.request(LogoutRequest {}).await?;
        *self.session.lock().expect("session cache poisoned") = None;
        *self.usage.lock().expect("usage cache poisoned") = None;
        Ok(())
    }

    /// Re-fetch the identity behind the cookie, refreshing the local cache.
    pub async fn me(&self) -> CoreResult<Identity> {
        let identity = self.client.request(GetMeRequest {}).await?;
        *self.session.lock().expect("session cache poisoned") = Some(identity.clone());
        Ok(identity)
    }

    #[instrument(level = "info", skip(self), err(Debug))]
    pub async fn change_name(&self, new_name: &str) -> CoreResult<String> {
        let user_id = self.session()?.id;
        let resp = self
            .client
            .request(ChangeNameRequest { user_id, new_name: new_name.to_string() })
            .await?;
        if let Some(identity) = self
            .session
            .lock()
            .expect("session cache poisoned")
            .as_mut()
        {
            identity.name = resp.name.clone();
        }
        Ok(resp.name)
    }

    #[instrument(level = "info", skip_all, err(Debug))]
    pub async fn change_password(
        &self, current_password: &str, new_password: &str, confirm_new_password: &str,
    ) -> CoreResult<()> {
        let user_id = self.session()?.id;
        self.client
            .request(ChangePasswordRequest {
                user_id,
                current_password: current_password.to_string(),
                new_password: new_password.to_string(),
                confirm_new_password: confirm_new_password.to_string(),
            })
            .await?;
        Ok(())
    }

    pub(crate) fn session(&self) -> CoreResult<Identity> {
        self.session
            .lock()
            .expect("session cache poisoned")
            .clone()
            .ok_or_else(|| CoreErrKind::NotLoggedIn.into())
    }
}
