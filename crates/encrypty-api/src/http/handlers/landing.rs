//! Landing page and JSON fallback for unmatched routes.

use axum::response::Html;

use crate::http::constants::MSG_ROUTE_NOT_FOUND;
use crate::http::errors::ApiError;

const LANDING_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Encrypty</title>
</head>
<body>
<h1>Encrypty</h1>
<section>
<h2>Process files</h2>
<form action="/api/encrypt" method="post" enctype="multipart/form-data">
<input type="file" name="files" multiple>
<select name="action">
<option value="encrypt">Encrypt</option>
<option value="decrypt">Decrypt</option>
</select>
<button type="submit">Submit</button>
</form>
</section>
<section>
<h2>Process a directory</h2>
<p>POST JSON <code>{"directory": "/absolute/path", "action": "encrypt"}</code> to
<code>/api/process-directory</code>.</p>
</section>
<p>Processed files are served from <code>/api/download/&lt;filename&gt;</code>.</p>
</body>
</html>
"#;

pub(crate) async fn landing() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

pub(crate) async fn route_not_found() -> ApiError {
    ApiError::not_found(MSG_ROUTE_NOT_FOUND)
}
