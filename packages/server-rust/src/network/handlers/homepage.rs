//! `GET /`: the single-page calculator UI.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../assets/index.html");

pub async fn homepage_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn page_has_inputs_buttons_and_result_area() {
        let Html(page) = homepage_handler().await;
        assert!(page.contains("Hello World"));
        assert!(page.contains(r#"id="a""#));
        assert!(page.contains(r#"id="b""#));
        assert!(page.contains(r#"id="result""#));
        for label in ["Add", "Subtract", "Multiply", "Divide"] {
            assert!(page.contains(&format!(">{label}</button>")), "{label}");
        }
    }
}
