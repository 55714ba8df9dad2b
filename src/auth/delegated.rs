//! Delegated (token-exchange) authentication.

use crate::auth::oauth::{OAuth1Signer, TokenRequest, TokenSigner};
use crate::auth::{AccessToken, AuthMode, AuthStrategy, Credentials, SignedRequest};
use crate::error::SigningError;
use crate::http::HttpMethod;
use crate::query::Params;

/// Authorizes requests with an access token pair through a [`TokenSigner`].
#[derive(Debug)]
pub struct DelegatedAuth {
    access_token: AccessToken,
    signer: Box<dyn TokenSigner>,
}

impl DelegatedAuth {
    pub fn new(access_token: AccessToken, signer: impl TokenSigner + 'static) -> Self {
        Self {
            access_token,
            signer: Box::new(signer),
        }
    }

    /// OAuth 1.0a with the application keys as consumer credentials.
    pub fn oauth1(
        credentials: &Credentials,
        access_token: AccessToken,
        params_in_headers: bool,
    ) -> Self {
        let signer = OAuth1Signer::new(&credentials.public_key, &credentials.secret_key)
            .params_in_headers(params_in_headers);
        Self::new(access_token, signer)
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }
}

impl AuthStrategy for DelegatedAuth {
    fn mode(&self) -> AuthMode {
        AuthMode::Delegated
    }

    fn build(
        &self,
        url: &str,
        method: HttpMethod,
        params: Params,
    ) -> Result<SignedRequest, SigningError> {
        let signed = self.signer.sign(TokenRequest {
            method,
            url,
            access_token: &self.access_token,
            params,
        })?;

        Ok(SignedRequest {
            query: signed.payload.into_query_string()?,
            headers: signed.headers,
        })
    }
}
