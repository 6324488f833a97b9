//! Guess validation over HTTP

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::game::{EvaluationError, ValidationRequest, ValidationResponse, Verdict};

fn transport(err: JsValue) -> EvaluationError {
    EvaluationError::Transport(format!("{err:?}"))
}

/// POST `{guess, answer}` as JSON and read back `{result}`
pub async fn validate(
    endpoint: &str,
    request: &ValidationRequest,
) -> Result<Verdict, EvaluationError> {
    let body =
        serde_json::to_string(request).map_err(|e| EvaluationError::Malformed(e.to_string()))?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(&body));
    let http_request = Request::new_with_str_and_init(endpoint, &init).map_err(transport)?;
    http_request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(transport)?;

    let window =
        web_sys::window().ok_or_else(|| EvaluationError::Transport("no window".to_string()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&http_request))
        .await
        .map_err(transport)?
        .dyn_into()
        .map_err(transport)?;
    if !response.ok() {
        return Err(EvaluationError::Transport(format!(
            "HTTP {}",
            response.status()
        )));
    }

    let text = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?
        .as_string()
        .ok_or_else(|| EvaluationError::Malformed("response body is not text".to_string()))?;
    let parsed: ValidationResponse =
        serde_json::from_str(&text).map_err(|e| EvaluationError::Malformed(e.to_string()))?;
    Ok(parsed.into())
}
