//! SQLite-backed data store for tours and bookings.
//!
//! Handlers are stateless: every request opens its own [`Store`] and the
//! connection closes when the value drops, including on error paths.
//! Schema creation is an explicit startup step ([`Store::init_schema`]),
//! not something handlers repeat per request.

use std::path::Path;

use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::booking::BookingRecord;
use crate::error::Result;
use crate::feed::NewTour;
use crate::filter::{CatalogFilter, RESULT_LIMIT};
use crate::model::{defaults, parse_included, Tour, TourSummary};

const TOUR_COLUMNS: &str = "id, title, destination, country, price, price_formatted, \
     duration, nights, departure, dates, image_url, rating, reviews, hotel, hotel_stars, \
     included, category, meal, flight_included, discount, original_price, description, source";

/// A scoped connection to the tour-booking database.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open a fresh connection to the database at `path`.
    ///
    /// Registers the `lower_utf8` SQL function used by destination
    /// filtering; SQLite's built-in LOWER only folds ASCII.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.create_scalar_function(
            "lower_utf8",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let text: Option<String> = ctx.get(0)?;
                Ok(text.map(|s| s.to_lowercase()))
            },
        )?;
        Ok(Self { conn })
    }

    /// Create the tours and bookings tables if they do not exist.
    ///
    /// Run once at service startup rather than per request.
    pub fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tours (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                destination TEXT NOT NULL,
                country TEXT NOT NULL,
                price INTEGER NOT NULL CHECK (price >= 0),
                price_formatted TEXT NOT NULL,
                duration TEXT,
                nights INTEGER,
                departure TEXT,
                dates TEXT,
                image_url TEXT,
                rating REAL,
                reviews INTEGER,
                hotel TEXT,
                hotel_stars INTEGER,
                included TEXT,
                category TEXT NOT NULL,
                meal TEXT,
                flight_included INTEGER,
                discount INTEGER,
                original_price INTEGER,
                description TEXT,
                source TEXT
            );
            CREATE TABLE IF NOT EXISTS bookings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tour_id INTEGER NOT NULL,
                customer_name TEXT NOT NULL,
                customer_email TEXT NOT NULL,
                customer_phone TEXT NOT NULL,
                tourists TEXT,
                comment TEXT,
                status TEXT DEFAULT 'pending',
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );",
        )?;
        Ok(())
    }

    /// Query tours matching `filter`, ordered by ascending price.
    ///
    /// Results are capped at [`RESULT_LIMIT`] rows and every optional
    /// column is defaulted so the returned records are fully populated.
    pub fn query_tours(&self, filter: &CatalogFilter) -> Result<Vec<Tour>> {
        let (where_sql, mut bound) = filter.to_sql();
        let sql = format!(
            "SELECT {TOUR_COLUMNS} FROM tours WHERE {where_sql} ORDER BY price ASC LIMIT ?"
        );
        bound.push(Value::from(RESULT_LIMIT as i64));

        debug!(sql = %sql, params = bound.len(), "querying tours");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bound), row_to_tour)?;

        let mut tours = Vec::new();
        for entry in rows {
            tours.push(entry?);
        }
        Ok(tours)
    }

    /// Read the whole catalog ordered by ascending price, no filtering.
    pub fn list_catalog(&self) -> Result<Vec<Tour>> {
        let sql = format!("SELECT {TOUR_COLUMNS} FROM tours ORDER BY price ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_tour)?;

        let mut tours = Vec::new();
        for entry in rows {
            tours.push(entry?);
        }
        Ok(tours)
    }

    /// Replace the entire catalog with a freshly generated dataset.
    ///
    /// The delete and inserts run in one transaction so concurrent readers
    /// never observe a partially refreshed or empty catalog.
    pub fn replace_catalog(&mut self, tours: &[NewTour]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM tours", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO tours \
                 (title, destination, country, price, price_formatted, duration, image_url, \
                  description, category, source) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for tour in tours {
                stmt.execute(params![
                    tour.title,
                    tour.destination,
                    tour.country,
                    tour.price,
                    tour.price_formatted,
                    tour.duration,
                    tour.image_url,
                    tour.description,
                    tour.category,
                    tour.source,
                ])?;
            }
        }
        tx.commit()?;
        Ok(tours.len())
    }

    /// Persist a validated booking and return the store-assigned id.
    ///
    /// The tour reference is not checked against existing tours, and
    /// identical submissions create independent rows.
    pub fn insert_booking(&self, record: &BookingRecord) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO bookings \
             (tour_id, customer_name, customer_email, customer_phone, tourists, comment) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.tour_id,
                record.name,
                record.email,
                record.phone,
                record.tourists,
                record.comment,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Look up the display summary for a booked tour.
    pub fn tour_summary(&self, tour_id: i64) -> Result<Option<TourSummary>> {
        let summary = self
            .conn
            .query_row(
                "SELECT title, destination, price_formatted FROM tours WHERE id = ?1",
                params![tour_id],
                |row| {
                    Ok(TourSummary {
                        title: row.get(0)?,
                        destination: row.get(1)?,
                        price: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(summary)
    }

    /// Access the underlying connection, for fixtures and test seeding.
    pub fn raw(&self) -> &Connection {
        &self.conn
    }

    /// Count stored tours; used by readiness probes and tests.
    pub fn count_tours(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM tours", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Count stored bookings; used by tests.
    pub fn count_bookings(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM bookings", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn row_to_tour(row: &Row<'_>) -> rusqlite::Result<Tour> {
    let included: Option<String> = row.get("included")?;
    Ok(Tour {
        id: row.get("id")?,
        title: row.get("title")?,
        destination: row.get("destination")?,
        country: row.get("country")?,
        price: row.get("price")?,
        price_formatted: row.get("price_formatted")?,
        original_price: row.get("original_price")?,
        discount: row.get::<_, Option<i64>>("discount")?.unwrap_or(0),
        nights: row
            .get::<_, Option<i64>>("nights")?
            .unwrap_or(defaults::NIGHTS),
        departure: row
            .get::<_, Option<String>>("departure")?
            .unwrap_or_else(|| defaults::DEPARTURE.to_string()),
        dates: row
            .get::<_, Option<String>>("dates")?
            .unwrap_or_else(|| defaults::DATES.to_string()),
        duration: row
            .get::<_, Option<String>>("duration")?
            .unwrap_or_default(),
        image: row
            .get::<_, Option<String>>("image_url")?
            .unwrap_or_default(),
        rating: row
            .get::<_, Option<f64>>("rating")?
            .unwrap_or(defaults::RATING),
        reviews: row.get::<_, Option<i64>>("reviews")?.unwrap_or(0),
        hotel: row
            .get::<_, Option<String>>("hotel")?
            .unwrap_or_else(|| defaults::HOTEL.to_string()),
        hotel_stars: row
            .get::<_, Option<i64>>("hotel_stars")?
            .unwrap_or(defaults::HOTEL_STARS),
        included: parse_included(included.as_deref()),
        category: row.get("category")?,
        meal: row
            .get::<_, Option<String>>("meal")?
            .unwrap_or_else(|| defaults::MEAL.to_string()),
        flight_included: row
            .get::<_, Option<bool>>("flight_included")?
            .unwrap_or(true),
        description: row
            .get::<_, Option<String>>("description")?
            .unwrap_or_default(),
        source: row.get::<_, Option<String>>("source")?.unwrap_or_default(),
    })
}
