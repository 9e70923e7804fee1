use axum::extract::State;
use axum::response::Redirect;
use axum::Form;
use serde::Deserialize;

use crate::session::Viewer;
use crate::state::AppState;
use crate::utils::error::AppError;

/// Posted from the category dropdown inside the event form, so the other
/// event fields arrive too and are ignored.
#[derive(Debug, Deserialize)]
pub struct NewCategoryForm {
    #[serde(default)]
    pub new_category: String,
    pub return_to: Option<String>,
}

pub async fn create_category(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<NewCategoryForm>,
) -> Result<Redirect, AppError> {
    let name = form.new_category.trim();
    if name.is_empty() {
        return Err(AppError::ValidationError(
            "Category name must not be empty".to_string(),
        ));
    }

    let category = state.store.create_category(name).await?;
    tracing::info!(
        category_id = %category.id,
        name = %category.name,
        user_id = %viewer.user_id,
        "Category created"
    );

    Ok(Redirect::to(&local_path(form.return_to.as_deref())))
}

/// Only same-site paths are followed after a form post.
fn local_path(value: Option<&str>) -> String {
    match value {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_path() {
        assert_eq!(local_path(Some("/events/create")), "/events/create");
        assert_eq!(local_path(Some("//evil.example")), "/");
        assert_eq!(local_path(Some("https://evil.example")), "/");
        assert_eq!(local_path(Some("/\\evil.example")), "/");
        assert_eq!(local_path(None), "/");
    }
}
