//! Training session details - Model (API functions)

use contracts::domain::a001_training_session::documents::DocumentRequest;
use contracts::domain::a001_training_session::submission::{
    FormValue, ReviewRequest, Submission,
};
use contracts::domain::a001_training_session::{SessionDetail, SessionId};
use wasm_bindgen::JsCast;
use web_sys::{Blob, File, FormData, Request, RequestInit, RequestMode, Response};

use crate::shared::api_utils::ApiContext;

async fn send(ctx: &ApiContext, request: Request) -> Result<Response, String> {
    if let Some(auth) = ctx.authorization() {
        request
            .headers()
            .set("Authorization", &auth)
            .map_err(|e| format!("{e:?}"))?;
    }

    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    let resp_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("{e:?}"))?;
    let resp: Response = resp_value.dyn_into().map_err(|e| format!("{e:?}"))?;

    if resp.status() == 404 {
        return Err("Not found".to_string());
    }
    if !resp.ok() {
        return Err(error_text(&resp).await);
    }
    Ok(resp)
}

/// `HTTP <status>` plus the server's message when it sent one
async fn error_text(resp: &Response) -> String {
    let status = format!("HTTP {}", resp.status());
    let Ok(promise) = resp.text() else {
        return status;
    };
    match wasm_bindgen_futures::JsFuture::from(promise).await {
        Ok(text) => match text.as_string().map(|t| t.trim().to_string()) {
            Some(body) if !body.is_empty() => format!("{status}: {body}"),
            _ => status,
        },
        Err(_) => status,
    }
}

async fn read_text(resp: Response) -> Result<String, String> {
    let text = wasm_bindgen_futures::JsFuture::from(resp.text().map_err(|e| format!("{e:?}"))?)
        .await
        .map_err(|e| format!("{e:?}"))?;
    text.as_string().ok_or_else(|| "bad text".to_string())
}

fn json_request(url: &str, body: &str) -> Result<Request, String> {
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&wasm_bindgen::JsValue::from_str(body));

    let request = Request::new_with_str_and_init(url, &opts).map_err(|e| format!("{e:?}"))?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|e| format!("{e:?}"))?;
    Ok(request)
}

/// Загрузить сессию и её состав
pub async fn fetch_by_id(ctx: &ApiContext, id: SessionId) -> Result<SessionDetail, String> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let url = ctx.url(&format!("/api/training-sessions/{}", id));
    let request = Request::new_with_str_and_init(&url, &opts).map_err(|e| format!("{e:?}"))?;
    request
        .headers()
        .set("Accept", "application/json")
        .map_err(|e| format!("{e:?}"))?;

    let resp = send(ctx, request).await?;
    let text = read_text(resp).await?;
    let data: SessionDetail = serde_json::from_str(&text).map_err(|e| format!("{e}"))?;
    Ok(data)
}

/// Отправить посещаемость, оценки и файлы (черновик или финализация)
pub async fn submit_finalization(
    ctx: &ApiContext,
    id: SessionId,
    submission: &Submission<'_, File>,
) -> Result<(), String> {
    let form_data = FormData::new().map_err(|e| format!("{e:?}"))?;
    for field in &submission.fields {
        match &field.value {
            FormValue::Text(value) => form_data
                .append_with_str(&field.name, value)
                .map_err(|e| format!("{e:?}"))?,
            FormValue::File(file) => form_data
                .append_with_blob_and_filename(&field.name, file, &file.name())
                .map_err(|e| format!("{e:?}"))?,
        }
    }

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&form_data);

    let url = ctx.url(&format!("/api/training-sessions/{}/finalize", id));
    let request = Request::new_with_str_and_init(&url, &opts).map_err(|e| format!("{e:?}"))?;

    send(ctx, request).await?;
    Ok(())
}

/// Решение HR по сессии
pub async fn submit_review(
    ctx: &ApiContext,
    id: SessionId,
    review: &ReviewRequest,
) -> Result<(), String> {
    let body = serde_json::to_string(review).map_err(|e| format!("{e}"))?;
    let url = ctx.url(&format!("/api/training-sessions/{}/review", id));
    let request = json_request(&url, &body)?;
    send(ctx, request).await?;
    Ok(())
}

/// Сгенерировать PDF на сервере и получить его содержимое
pub async fn generate_document(ctx: &ApiContext, document: &DocumentRequest) -> Result<Blob, String> {
    let body = serde_json::to_string(document).map_err(|e| format!("{e}"))?;
    let url = ctx.url(&format!("/api/documents/{}", document.kind.endpoint()));
    let request = json_request(&url, &body)?;
    request
        .headers()
        .set("Accept", "application/pdf")
        .map_err(|e| format!("{e:?}"))?;

    let resp = send(ctx, request).await?;
    let blob = wasm_bindgen_futures::JsFuture::from(resp.blob().map_err(|e| format!("{e:?}"))?)
        .await
        .map_err(|e| format!("{e:?}"))?;
    blob.dyn_into::<Blob>().map_err(|e| format!("{e:?}"))
}
