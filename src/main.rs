extern crate dotenv;
extern crate helpdesk;

use dotenv::dotenv;

use helpdesk::config::Environment;
use helpdesk::Error;

#[rocket::main]
async fn main() -> Result<(), Error> {
    dotenv().ok();

    let env = Environment::from_env()?;
    let _ = helpdesk::rocket(env)?.launch().await?;

    Ok(())
}
