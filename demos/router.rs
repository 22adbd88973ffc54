//! Register a handful of routes and dispatch one request against them.
//!
//! Run under a CGI-style environment (`REQUEST_METHOD`, `REQUEST_URI`, ...)
//! to route a real request, or with no environment to use the built-in
//! sample request:
//!
//! ```text
//! cargo run --example router
//! REQUEST_METHOD=GET REQUEST_URI=/users/7/posts/2 cargo run --example router
//! ```

use std::io::Write;

use switchback::{CgiTransport, Controller, Handler, HandlerError, Router};

struct Users;

impl Controller for Users {
    fn call(&self, method: &str, params: &[String]) -> Result<(), HandlerError> {
        match method {
            "show" => {
                println!("controller: user {}", params[0]);
                Ok(())
            }
            _ => Err(HandlerError::UnknownMethod {
                controller: "Users".to_string(),
                method: method.to_string(),
            }),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut router = Router::new();
    router.registry_mut().register("Users", || Box::new(Users));

    router.before_all("/{_}", |_: &[String]| {
        println!("middleware: request incoming");
    })?;
    router.get("/", |_: &[String]| println!("home"))?;
    router.get("/users/{id}", Handler::named("Users@show")?)?;
    router.mount("/users/{id}", |r| {
        r.get("/posts/{postId}", |params: &[String]| {
            println!("post {} of user {}", params[1], params[0]);
        })
    })?;
    router.set_404(|_: &[String]| println!("no such page"));

    let mut request = CgiTransport::from_env().or_else(|_| {
        CgiTransport::from_vars([
            ("REQUEST_METHOD", "GET"),
            ("REQUEST_URI", "/users/42"),
            ("SCRIPT_NAME", "/index.cgi"),
        ])
    })?;

    let matched = router.run(&mut request);
    request.flush_to(&mut std::io::stdout().lock())?;
    writeln!(std::io::stdout(), "matched: {matched}")?;
    Ok(())
}
