use serde::{Deserialize, Serialize};

use crate::codegen::artifact::{ComponentKind, GeneratedArtifact};
use crate::codegen::paths::resolve;
use crate::codegen::python::string_literal;

/// Capability tags the role synthesizer knows how to expand.
pub const KNOWN_CAPABILITIES: &[&str] = &["can_login"];

/// Login credentials baked into the generated role as `DEFAULT_USER_DATA`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoleGeneration {
    pub artifact: GeneratedArtifact,
    pub ignored_capabilities: Vec<String>,
}

const LOGIN_CAPABILITY: &str = r#"
    # ==================== AUTHENTICATION WORKFLOWS ====================

    def login(self) -> bool:
        """
        Log in to the application.

        High-level business workflow that orchestrates authentication.

        Returns:
            True if login successful, False otherwise
        """
        return self.common_tasks.log_in(self.email, self.password)

    def logout(self) -> bool:
        """
        Log out from the application.

        Returns:
            True if logout successful, False otherwise
        """
        return self.common_tasks.log_out()

    def is_logged_in(self) -> bool:
        """
        Check if user is currently logged in.

        Returns:
            True if logged in, False otherwise
        """
        return self.common_tasks.verify_logged_in()
"#;

/// Generate a role class composing `CommonTasks`.
///
/// Unrecognized capability tags add no code; they are returned in
/// `ignored_capabilities` so callers can surface them.
pub fn generate_role(
    role_name: &str,
    capabilities: &[String],
    credentials: Option<&Credentials>,
) -> RoleGeneration {
    let mut capability_methods = String::new();
    let mut ignored = Vec::new();
    for capability in capabilities {
        match capability.as_str() {
            "can_login" => {
                if capability_methods.is_empty() {
                    capability_methods.push_str(LOGIN_CAPABILITY);
                }
            }
            other => ignored.push(other.to_string()),
        }
    }

    let listed = if capabilities.is_empty() {
        "None specified".to_string()
    } else {
        capabilities.join(", ")
    };

    let user_data = match credentials.filter(|c| !c.is_empty()) {
        Some(creds) => {
            let mut entries = Vec::new();
            if let Some(email) = &creds.email {
                entries.push(format!("    \"email\": {},", string_literal(email)));
            }
            if let Some(password) = &creds.password {
                entries.push(format!("    \"password\": {},", string_literal(password)));
            }
            format!("\n\nDEFAULT_USER_DATA: Dict[str, Any] = {{\n{}\n}}", entries.join("\n"))
        }
        None => String::new(),
    };

    let code = format!(
        r#""""
{role_name} Role.

This role represents a user with specific capabilities and permissions.
"""

from typing import Dict, Any
from framework.roles.role import Role
from framework.interfaces.web_interface import WebInterface
from framework.tasks.common_tasks import CommonTasks{user_data}


class {role_name}(Role):
    """
    {role_name} role with workflow capabilities.

    Capabilities: {listed}
    """

    def __init__(self, web_interface: WebInterface, user_data: Dict[str, Any], base_url: str):
        """
        Initialize {role_name}.

        Args:
            web_interface: WebInterface instance for browser interactions
            user_data: Dictionary containing user credentials and profile data
            base_url: Application base URL for navigation
        """
        super().__init__(web_interface, user_data)

        # Validate required credentials
        if not self.has_credentials():
            raise ValueError("{role_name} requires email and password in user_data")

        # Compose task modules
        self.common_tasks = CommonTasks(web_interface, base_url)

        # TODO: Add additional task modules as needed
{capability_methods}
    # TODO: Add role-specific workflow methods
"#
    );

    let artifact = GeneratedArtifact::new(
        ComponentKind::Role,
        role_name,
        resolve(ComponentKind::Role, role_name, None),
        code,
    )
    .with_meta("capabilities", capabilities.to_vec())
    .with_meta("ignored_capabilities", ignored.clone());

    RoleGeneration {
        artifact,
        ignored_capabilities: ignored,
    }
}
