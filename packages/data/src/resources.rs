//! Preparedness resources from the `get_all_ressurser` remote procedure.

use beredskap_map_resource_models::{ResourceRecord, ResourceRow};
use beredskap_map_supabase::{RpcClient, rpc};
use geojson::{Feature, FeatureCollection, JsonObject};

use crate::DataError;
use crate::features::{collection, point_feature};

/// Name of the remote procedure listing all resources.
pub const GET_ALL_RESOURCES_FN: &str = "get_all_ressurser";

/// Fetches all resources and normalizes them into point features.
///
/// # Errors
///
/// Returns [`DataError::Remote`] if the remote call fails or its rows do
/// not have the expected shape. The failure is logged here; callers only
/// need to skip the resource layer.
pub async fn fetch_resources(client: &dyn RpcClient) -> Result<FeatureCollection, DataError> {
    let rows: Vec<ResourceRow> =
        match rpc(client, GET_ALL_RESOURCES_FN, serde_json::json!({})).await {
            Ok(rows) => rows,
            Err(e) => {
                log::error!("Failed to fetch resources: {e}");
                return Err(e.into());
            }
        };

    log::info!("Fetched {} resources", rows.len());

    Ok(rows_to_collection(rows))
}

/// Converts resource rows into a feature collection, preserving row order.
#[must_use]
pub fn rows_to_collection(rows: Vec<ResourceRow>) -> FeatureCollection {
    collection(
        rows.into_iter()
            .map(ResourceRecord::from)
            .map(|record| resource_feature(&record))
            .collect(),
    )
}

/// Builds the point feature for one resource.
///
/// Properties are exactly `navn`, `kategori` and `beskrivelse`.
#[must_use]
pub fn resource_feature(record: &ResourceRecord) -> Feature {
    let mut props = JsonObject::new();
    props.insert("navn".to_string(), record.name.clone().into());
    props.insert("kategori".to_string(), record.category.clone().into());
    props.insert("beskrivelse".to_string(), record.description.clone().into());

    point_feature(record.position(), props)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::point_position;
    use beredskap_map_resource_models::LonLat;
    use beredskap_map_supabase::testing::StaticRpc;

    fn rows() -> serde_json::Value {
        serde_json::json!([
            {
                "navn": "Hjertestarter Torvet",
                "kategori": "Hjertestarter",
                "beskrivelse": "Ved inngangen til kjøpesenteret",
                "lng": 7.9956,
                "lat": 58.1462
            },
            {
                "navn": "Kristiansand brannstasjon",
                "kategori": "Brannstasjon",
                "beskrivelse": "Døgnbemannet",
                "lng": 8.0182,
                "lat": 58.1521
            },
            {
                "navn": "Sykehuset Sørlandet",
                "kategori": "Sykehus",
                "beskrivelse": "Akuttmottak",
                "lng": 7.9806,
                "lat": 58.1598
            }
        ])
    }

    #[tokio::test]
    async fn preserves_length_order_and_coordinates() {
        let client = StaticRpc::new().with_response(GET_ALL_RESOURCES_FN, rows());

        let fc = fetch_resources(&client).await.unwrap();

        assert_eq!(fc.features.len(), 3);
        let expected = [
            LonLat::new(7.9956, 58.1462),
            LonLat::new(8.0182, 58.1521),
            LonLat::new(7.9806, 58.1598),
        ];
        for (feature, pos) in fc.features.iter().zip(expected) {
            assert_eq!(point_position(feature), Some(pos));
        }
        assert_eq!(
            fc.features[1].property("navn"),
            Some(&serde_json::json!("Kristiansand brannstasjon"))
        );
    }

    #[tokio::test]
    async fn properties_are_exactly_name_category_description() {
        let client = StaticRpc::new().with_response(GET_ALL_RESOURCES_FN, rows());

        let fc = fetch_resources(&client).await.unwrap();
        let props = fc.features[0].properties.as_ref().unwrap();

        let mut keys: Vec<&str> = props.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["beskrivelse", "kategori", "navn"]);
    }

    #[tokio::test]
    async fn calls_procedure_without_parameters() {
        let client = StaticRpc::new().with_response(GET_ALL_RESOURCES_FN, serde_json::json!([]));

        let fc = fetch_resources(&client).await.unwrap();

        assert!(fc.features.is_empty());
        assert_eq!(
            client.calls(),
            vec![(GET_ALL_RESOURCES_FN.to_string(), serde_json::json!({}))]
        );
    }

    #[tokio::test]
    async fn remote_failure_returns_error() {
        let client = StaticRpc::new().with_failure(GET_ALL_RESOURCES_FN, 500, "boom");

        let result = fetch_resources(&client).await;
        assert!(matches!(result, Err(DataError::Remote(_))));
    }

    #[tokio::test]
    async fn null_description_reads_as_empty() {
        let client = StaticRpc::new().with_response(
            GET_ALL_RESOURCES_FN,
            serde_json::json!([
                { "navn": "Hjertestarter Torvet", "kategori": "Hjertestarter", "beskrivelse": "Ved inngangen", "lng": 7.9956, "lat": 58.1462 },
                { "navn": "Brannstasjon", "kategori": "Brann", "beskrivelse": null, "lng": 8.0182, "lat": 58.1521 },
                { "navn": "Sykehus", "kategori": "Sykehus", "lng": 7.9806, "lat": 58.1598 }
            ]),
        );

        let fc = fetch_resources(&client).await.unwrap();

        assert_eq!(fc.features.len(), 3);
        assert_eq!(fc.features[1].property("beskrivelse"), Some(&serde_json::json!("")));
        assert_eq!(fc.features[2].property("beskrivelse"), Some(&serde_json::json!("")));
        assert_eq!(point_position(&fc.features[1]), Some(LonLat::new(8.0182, 58.1521)));
    }

    #[tokio::test]
    async fn malformed_rows_return_error() {
        let client = StaticRpc::new()
            .with_response(GET_ALL_RESOURCES_FN, serde_json::json!([{ "navn": "uten posisjon" }]));

        assert!(fetch_resources(&client).await.is_err());
    }
}
