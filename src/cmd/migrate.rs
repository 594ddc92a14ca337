use crate::{pkg::internal::adaptors::analyses::store::Store, prelude::Result};

pub async fn apply() -> Result<()> {
    let store = Store::connect()?;
    store.init().await?;
    println!("Migrations applied successfully");
    Ok(())
}
