//! `fcli api` -- raw GET against the selected forge, for debugging.

use std::io::Write;

use anyhow::Result;

use forge_http::Endpoint;

use crate::cli::ApiArgs;
use crate::runtime::Runtime;

pub fn run(rt: &Runtime, args: &ApiArgs) -> Result<()> {
    let ctx = rt.ctx();
    let forge = rt.forge()?;

    let base = ctx.api_base()?;
    let path = args.path.trim_start_matches('/');
    let url = format!("{}/{}", base.trim_end_matches('/'), path);

    let auth = ctx.token().and_then(|t| forge.make_auth_header(&t));
    let response = ctx.http().get(&Endpoint {
        url: &url,
        auth: auth.as_deref(),
        api_error: forge.api_error_fn(),
    })?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(response.body.as_bytes())?;
    if !response.body.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}
