//! Login, registration and logout flows

use serde_json::Value;
use tracing::{error, info};

use crate::client::ApiClient;
use crate::error::{GatewayError, GatewayResult};
use crate::models::{JwtResponse, LoginRequest, RegisterRequest};
use crate::routes::AppRoute;
use crate::session::{Role, SessionState};
use crate::validation::validate_registration;

impl ApiClient {
    /// Log in and persist the resulting session.
    ///
    /// The session keeps the most privileged role the backend granted and the
    /// customer (or therapist) id when there is one.
    pub async fn login(&self, username: &str, password: &str) -> GatewayResult<SessionState> {
        info!("Login attempt for user: {}", username);

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: JwtResponse = self.post("/auth/login", &request).await.into_result()?;

        let role = Role::highest(&response.roles);
        let user_id = response.session_user_id().to_string();

        if let Err(e) = self.session().set_session(&response.token, role, &user_id) {
            error!("Failed to persist session: {}", e);
            self.notifier().error("Login failed");
            return Err(e.into());
        }

        self.notifier().success("Login successful");
        self.navigator()
            .navigate(&AppRoute::landing_for(role).path());

        Ok(SessionState::Authenticated {
            role: Some(role),
            user_id: Some(user_id),
        })
    }

    /// Register a new account. The form is checked locally first and
    /// nothing is sent when it is invalid.
    pub async fn register(&self, request: &RegisterRequest) -> GatewayResult<()> {
        if let Err(message) = validate_registration(request) {
            self.notifier().error(&message);
            return Err(GatewayError::Validation(message));
        }

        info!("Registering user: {}", request.username);
        self.post::<Value, _>("/auth/register", request)
            .await
            .into_result()?;

        self.notifier()
            .success("Registration successful. Please login.");
        self.navigator().navigate(&self.config().login_route);
        Ok(())
    }

    /// Drop the session and return to the home page
    pub fn logout(&self) -> GatewayResult<()> {
        self.session().clear_session()?;
        self.navigator().navigate(&AppRoute::Home.path());
        self.notifier().success("Logged out successfully");
        Ok(())
    }
}
