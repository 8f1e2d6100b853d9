// Implicit grant through the user's browser.
// The service redirects to a local listener with the token in the URL fragment, which browsers
// don't send, so the first page load bounces the fragment into the query string.

use axum::{extract::State, http::Uri, response::Html, routing::get, Router};
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use url::Url;

use std::io::{self, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use judge_util::query_param;

use crate::error::{Error, Result};
use crate::service::ServiceEndpoint;

const TEMPLATE_SUCCESS: &str = r#"<html>
<body><p>Thanks! You may close this window now.</p></body>
</html>
"#;

const TEMPLATE_FAIL: &str = r#"<html>
<body><p>Authorization failed, no access token was received.</p></body>
</html>
"#;

const TEMPLATE_REDIRECT: &str = r#"<html>
<head>
<script>
window.location = window.location.toString().replace('#', '?');
</script>
</head>
</html>
"#;

/// Build the URL the user opens to authorize this client.
pub fn authorization_url(endpoint: &ServiceEndpoint, client_id: &str, port: u16) -> Result<Url> {
    let redirect_uri = format!("http://localhost:{}", port);
    let url = Url::parse_with_params(
        endpoint.authorize_url,
        [
            ("client_id", client_id),
            ("response_type", "token"),
            ("scope", endpoint.scope),
            ("redirect_uri", redirect_uri.as_str()),
        ],
    )?;
    Ok(url)
}

/// Local listener receiving the redirect of a grant.
pub struct CallbackServer {
    listener: TcpListener,
}

impl CallbackServer {
    pub fn bind(addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve callback requests until one of them carries an access token.
    pub async fn wait_for_token(self) -> Result<String> {
        let (sender, receiver) = watch::channel(None::<String>);
        let app = Router::new()
            .route("/", get(callback))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::new(sender));

        let mut shutdown = receiver.clone();
        axum::Server::from_tcp(self.listener)
            .map_err(|e| Error::ServerError(e.to_string()))?
            .serve(app.into_make_service())
            .with_graceful_shutdown(async move {
                while shutdown.changed().await.is_ok() {
                    if shutdown.borrow().is_some() {
                        break;
                    }
                }
            })
            .await
            .map_err(|e| Error::ServerError(e.to_string()))?;

        let token = receiver.borrow().clone();
        token.ok_or(Error::GrantIncomplete)
    }
}

async fn callback(State(sender): State<Arc<watch::Sender<Option<String>>>>, uri: Uri) -> Html<&'static str> {
    let Some(target) = uri.path_and_query().filter(|_| uri.query().is_some()) else {
        return Html(TEMPLATE_REDIRECT);
    };
    match query_param(target.as_str(), "access_token") {
        Ok(token) => {
            tracing::info!("Received access token");
            sender.send_replace(Some(token));
            Html(TEMPLATE_SUCCESS)
        }
        Err(e) => {
            tracing::warn!("Callback without access token: {}", e);
            Html(TEMPLATE_FAIL)
        }
    }
}

/// Ask the user to authorize in the browser and wait for the redirect on `port`.
pub async fn obtain_token(authorization_url: &Url, port: u16) -> Result<String> {
    let server = CallbackServer::bind(SocketAddr::from(([127, 0, 0, 1], port)))?;
    present(authorization_url, webbrowser::open, &mut io::stderr())?;
    tracing::info!("Waiting for authorization callback on {}", server.local_addr()?);
    server.wait_for_token().await
}

/// Open `url` with `open`, printing it to `out` for the user to open by hand if that fails.
fn present<F, W>(url: &Url, open: F, out: &mut W) -> Result<()>
where
    F: FnOnce(&str) -> io::Result<()>,
    W: Write,
{
    match open(url.as_str()) {
        Ok(()) => tracing::info!("Opened authorization page in the browser"),
        Err(e) => {
            tracing::warn!("Cannot open a browser: {}", e);
            writeln!(out, "Open this URL in your browser to authorize access:\n\n    {}\n", url)?;
        }
    }
    Ok(())
}
