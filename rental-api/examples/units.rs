use rental_api::{Client, RentalApiError, Request, Resource, Settings};

#[tokio::main]
pub async fn main() -> Result<(), RentalApiError> {
    let settings = Settings::new().map_err(|e| RentalApiError::Configuration(e.to_string()))?;
    let client = Client::from_settings(&settings)?;

    let req = Request::resource(Resource::Units)
        .list::<serde_json::Value>()
        .ordering("unit_number");

    let _res = client.send(req).await?;
    Ok(())
}
