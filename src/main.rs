//! Serves the echo fixture application behind the request mutator.
//!
//! Try:
//!   curl 'http://localhost:3000/api/edge?action=set-query-param&name=b&value=2'
//!   curl -i 'http://localhost:3000/api/node?action=set-cookie&name=sid&value=xyz'
//!   curl -i 'http://localhost:3000/page/edge?action=set-header&name=x-debug&value=1'

use clap::Parser;
use reroute::config::Config;
use reroute::{Error, Server, echo, logging};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::parse();
    logging::init(config.log_format);

    Server::bind(config.listen).serve(echo::router()).await
}
