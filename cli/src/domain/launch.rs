//! Construction of the `run-instances` request.

use serde_json::{Map, Value, json};

use crate::domain::error::LaunchOptionsError;

/// Template-level launch parameters taken from settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTemplate<'a> {
    pub launch_template_id: &'a str,
    pub key_name: &'a str,
    pub image_id: Option<&'a str>,
    pub instance_type: Option<&'a str>,
}

/// Build the `run-instances` request body, then merge caller `options` over it.
///
/// `options` must be a JSON object; its top-level keys replace the defaults.
///
/// # Errors
///
/// Returns `LaunchOptionsError` if `options` is not valid JSON or not an object.
pub fn launch_request(
    template: &LaunchTemplate<'_>,
    options: Option<&str>,
) -> Result<Value, LaunchOptionsError> {
    let mut request = Map::new();
    request.insert(
        "LaunchTemplate".to_string(),
        json!({ "LaunchTemplateId": template.launch_template_id }),
    );
    request.insert("MinCount".to_string(), json!(1));
    request.insert("MaxCount".to_string(), json!(1));
    request.insert("KeyName".to_string(), json!(template.key_name));
    if let Some(image) = template.image_id {
        request.insert("ImageId".to_string(), json!(image));
    }
    if let Some(instance_type) = template.instance_type {
        request.insert("InstanceType".to_string(), json!(instance_type));
    }

    if let Some(raw) = options {
        let parsed: Value = serde_json::from_str(raw)
            .map_err(|e| LaunchOptionsError::InvalidJson(e.to_string()))?;
        let Value::Object(overrides) = parsed else {
            return Err(LaunchOptionsError::NotAnObject(raw.to_string()));
        };
        request.extend(overrides);
    }
    Ok(Value::Object(request))
}
