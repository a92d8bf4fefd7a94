//! Property CRUD operations.
//!
//! The `location` column is written only from [`PropertyInput::point`], inside
//! the insert and update statements below, so it always mirrors the stored
//! latitude and longitude.

use super::connection::Database;
use crate::Error;
use crate::geo::{Coordinates, GeoPoint};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A stored property record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Property {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates { latitude: self.latitude, longitude: self.longitude }
    }

    /// Point geometry derived from the current coordinates.
    pub fn location(&self) -> GeoPoint {
        GeoPoint::from_coordinates(self.coordinates())
    }

    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            address: row.get(2)?,
            latitude: row.get(3)?,
            longitude: row.get(4)?,
        })
    }
}

/// Create/update payload for a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInput {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PropertyInput {
    /// Check the coordinates before anything touches the store.
    pub fn validate(&self) -> Result<(), Error> {
        Coordinates { latitude: self.latitude, longitude: self.longitude }.validate()
    }

    fn point(&self) -> GeoPoint {
        GeoPoint::from_coordinates(Coordinates { latitude: self.latitude, longitude: self.longitude })
    }
}

pub(crate) const PROPERTY_COLUMNS: &str = "id, name, address, latitude, longitude";

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("property {id}"))
}

impl Database {
    /// Insert a new property and return it with its assigned id.
    pub async fn create_property(&self, input: &PropertyInput) -> Result<Property, Error> {
        input.validate()?;
        let input = input.clone();
        let location = input.point().to_ewkt();

        let property = self
            .conn
            .call(move |conn| -> Result<Property, Error> {
                conn.execute(
                    "INSERT INTO properties (name, address, latitude, longitude, location)
                    VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![input.name, input.address, input.latitude, input.longitude, location],
                )?;
                let id = conn.last_insert_rowid();
                Ok(Property {
                    id,
                    name: input.name,
                    address: input.address,
                    latitude: input.latitude,
                    longitude: input.longitude,
                })
            })
            .await
            .map_err(Error::from)?;

        tracing::info!(id = property.id, "created property");
        Ok(property)
    }

    /// Get a property by id.
    ///
    /// Returns `Error::NotFound` if no record has that id.
    pub async fn get_property(&self, id: i64) -> Result<Property, Error> {
        self.conn
            .call(move |conn| -> Result<Property, Error> {
                let mut stmt = conn.prepare(&format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = ?1"))?;

                match stmt.query_row(params![id], Property::from_row) {
                    Ok(p) => Ok(p),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Err(not_found(id)),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// All properties in id order.
    pub async fn list_properties(&self) -> Result<Vec<Property>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<Property>, Error> {
                let mut stmt = conn.prepare(&format!("SELECT {PROPERTY_COLUMNS} FROM properties ORDER BY id"))?;
                let rows = stmt.query_map([], Property::from_row)?;
                let properties = rows.collect::<Result<Vec<_>, _>>()?;
                Ok(properties)
            })
            .await
            .map_err(Error::from)
    }

    /// Replace every field of an existing property.
    ///
    /// The stored point is recomputed from the new coordinates.
    pub async fn update_property(&self, id: i64, input: &PropertyInput) -> Result<Property, Error> {
        input.validate()?;
        let input = input.clone();
        let location = input.point().to_ewkt();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                let changed = conn.execute(
                    "UPDATE properties
                    SET name = ?1, address = ?2, latitude = ?3, longitude = ?4, location = ?5
                    WHERE id = ?6",
                    params![input.name, input.address, input.latitude, input.longitude, location, id],
                )?;
                if changed == 0 { Err(not_found(id)) } else { Ok(()) }
            })
            .await
            .map_err(Error::from)?;

        tracing::info!(id, "updated property");
        self.get_property(id).await
    }

    /// Permanently remove a property.
    pub async fn delete_property(&self, id: i64) -> Result<(), Error> {
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let deleted = conn.execute("DELETE FROM properties WHERE id = ?1", params![id])?;
                if deleted == 0 { Err(not_found(id)) } else { Ok(()) }
            })
            .await
            .map_err(Error::from)?;

        tracing::info!(id, "deleted property");
        Ok(())
    }

    /// Stored EWKT point for a property, as persisted.
    pub async fn property_location(&self, id: i64) -> Result<String, Error> {
        self.conn
            .call(move |conn| -> Result<String, Error> {
                match conn.query_row("SELECT location FROM properties WHERE id = ?1", params![id], |row| {
                    row.get(0)
                }) {
                    Ok(location) => Ok(location),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Err(not_found(id)),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, latitude: f64, longitude: f64) -> PropertyInput {
        PropertyInput { name: name.to_string(), address: format!("{name} street 1"), latitude, longitude }
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let db = Database::open_in_memory().await.unwrap();
        let created = db.create_property(&input("Loft", 48.8566, 2.3522)).await.unwrap();
        assert!(created.id > 0);

        let fetched = db.get_property(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.latitude, 48.8566);
        assert_eq!(fetched.longitude, 2.3522);

        let location = db.property_location(created.id).await.unwrap();
        assert_eq!(location, "SRID=4326;POINT(2.3522 48.8566)");
        assert_eq!(location, fetched.location().to_ewkt());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let db = Database::open_in_memory().await.unwrap();
        let a = db.create_property(&input("A", 1.0, 1.0)).await.unwrap();
        let b = db.create_property(&input("A", 1.0, 1.0)).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_coordinates() {
        let db = Database::open_in_memory().await.unwrap();
        let result = db.create_property(&input("Bad", 91.0, 0.0)).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        let result = db.create_property(&input("Bad", 0.0, f64::NAN)).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        assert!(db.list_properties().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_properties() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(db.list_properties().await.unwrap().is_empty());

        db.create_property(&input("One", 10.0, 10.0)).await.unwrap();
        db.create_property(&input("Two", 20.0, 20.0)).await.unwrap();

        let all = db.list_properties().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "One");
        assert_eq!(all[1].name, "Two");
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_location() {
        let db = Database::open_in_memory().await.unwrap();
        let created = db.create_property(&input("Old", 10.0, 10.0)).await.unwrap();

        let updated = db
            .update_property(created.id, &input("New", -33.8688, 151.2093))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "New");
        assert_eq!(updated.address, "New street 1");
        assert_eq!(updated.latitude, -33.8688);
        assert_eq!(updated.longitude, 151.2093);

        let location = db.property_location(created.id).await.unwrap();
        assert_eq!(location, "SRID=4326;POINT(151.2093 -33.8688)");
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let db = Database::open_in_memory().await.unwrap();

        assert!(matches!(db.get_property(999).await, Err(Error::NotFound(_))));
        assert!(matches!(db.update_property(999, &input("X", 0.0, 0.0)).await, Err(Error::NotFound(_))));
        assert!(matches!(db.delete_property(999).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_is_permanent() {
        let db = Database::open_in_memory().await.unwrap();
        let created = db.create_property(&input("Gone", 0.0, 0.0)).await.unwrap();

        db.delete_property(created.id).await.unwrap();

        assert!(matches!(db.get_property(created.id).await, Err(Error::NotFound(_))));
        assert!(matches!(db.delete_property(created.id).await, Err(Error::NotFound(_))));
    }
}
