//! SQLite storage for households, rooms, chores and completion history.
//!
//! Every operation on household data takes the acting [`User`] and checks
//! property membership before touching anything. Missing parents surface as
//! [`AccessError::NotFound`], foreign ones as [`AccessError::Unauthorized`].

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{data_dir, migrations};
use crate::error::{AccessError, DatabaseError, Result, ValidationError};
use crate::floorplan::{Point, PropertyFloorplan, RoomShape, DEFAULT_ASPECT_RATIO, MIN_ROOM_POINTS};
use crate::household::{
    clean_name, validate_email, Chore, ChoreCompletion, ChoreStatus, Invite, Property, Room,
    RoomOverview, User, UserRole,
};
use crate::progress::{room_urgency, Frequency, FrequencyUnit};

const USER_COLUMNS: &str = "u.id, u.email, u.role, u.created_at";
const PROPERTY_COLUMNS: &str = "p.id, p.name, p.aspect_ratio, p.created_at";
const ROOM_COLUMNS: &str = "r.id, r.property_id, r.name, r.points, r.created_at";
const CHORE_COLUMNS: &str =
    "c.id, c.room_id, c.name, c.frequency, c.frequency_unit, c.created_at, c.updated_at";
const COMPLETION_COLUMNS: &str = "h.id, h.chore_id, h.user_id, h.completed_at";
const INVITE_COLUMNS: &str = "i.id, i.property_id, i.inviting_user_id, i.invited_user_email, i.created_at";

/// Fixed-width UTC timestamps so text ordering matches time ordering.
fn format_ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn parse_ts(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let role: String = row.get(2)?;
    let created_at: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        role: UserRole::parse(&role),
        created_at: parse_ts(3, &created_at)?,
    })
}

fn row_to_property(row: &Row) -> rusqlite::Result<Property> {
    let created_at: String = row.get(3)?;
    Ok(Property {
        id: row.get(0)?,
        name: row.get(1)?,
        aspect_ratio: row.get(2)?,
        created_at: parse_ts(3, &created_at)?,
    })
}

fn row_to_room(row: &Row) -> rusqlite::Result<Room> {
    let points: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    Ok(Room {
        id: row.get(0)?,
        property_id: row.get(1)?,
        name: row.get(2)?,
        points: serde_json::from_str::<Vec<Point>>(&points).map_err(|e| conversion_error(3, e))?,
        created_at: parse_ts(4, &created_at)?,
    })
}

fn row_to_chore(row: &Row) -> rusqlite::Result<Chore> {
    let unit: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;
    Ok(Chore {
        id: row.get(0)?,
        room_id: row.get(1)?,
        name: row.get(2)?,
        frequency: row.get(3)?,
        frequency_unit: unit.parse::<FrequencyUnit>().map_err(|e| conversion_error(4, e))?,
        created_at: parse_ts(5, &created_at)?,
        updated_at: parse_ts(6, &updated_at)?,
    })
}

fn row_to_completion(row: &Row) -> rusqlite::Result<ChoreCompletion> {
    let completed_at: String = row.get(3)?;
    Ok(ChoreCompletion {
        id: row.get(0)?,
        chore_id: row.get(1)?,
        user_id: row.get(2)?,
        completed_at: parse_ts(3, &completed_at)?,
    })
}

fn row_to_invite(row: &Row) -> rusqlite::Result<Invite> {
    let created_at: String = row.get(4)?;
    Ok(Invite {
        token: row.get(0)?,
        property_id: row.get(1)?,
        inviting_user_id: row.get(2)?,
        invited_email: row.get(3)?,
        created_at: parse_ts(4, &created_at)?,
    })
}

/// SQLite database holding every household record.
pub struct ChoreDb {
    conn: Connection,
}

impl ChoreDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `data_dir()/choreio.db`.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened,
    /// or if migration fails.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("choreio.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::init(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if migration fails.
    pub fn open_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // ── Users ───────────────────────────────────────────────────────────

    pub fn create_user(&self, email: &str, role: UserRole, now: DateTime<Utc>) -> Result<User> {
        let email = validate_email(email)?;
        if self.get_user_by_email(&email)?.is_some() {
            return Err(ValidationError::InvalidValue {
                field: "email".into(),
                message: format!("{email} is already registered"),
            }
            .into());
        }

        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO users (id, email, role, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![id, email, role.as_str(), format_ts(now)],
        )?;
        tracing::debug!(user_id = %id, %email, role = role.as_str(), "created user");

        Ok(self.get_user(&id)?.ok_or(AccessError::NotFound("User"))?)
    }

    pub fn get_user(&self, id: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = ?1");
        Ok(self.conn.query_row(&sql, [id], row_to_user).optional()?)
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.trim().to_ascii_lowercase();
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.email = ?1");
        Ok(self.conn.query_row(&sql, [email], row_to_user).optional()?)
    }

    /// The registered user behind `email`, or `NotAuthenticated`.
    pub fn require_user(&self, email: &str) -> Result<User> {
        Ok(self
            .get_user_by_email(email)?
            .ok_or(AccessError::NotAuthenticated)?)
    }

    // ── Access ──────────────────────────────────────────────────────────

    pub fn user_has_access_to_property(&self, user: &User, property_id: i64) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM user_to_property WHERE user_id = ?1 AND property_id = ?2",
                params![user.id, property_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn room_property_id(&self, room_id: i64) -> Result<i64> {
        let property_id: Option<i64> = self
            .conn
            .query_row("SELECT property_id FROM room WHERE id = ?1", [room_id], |row| row.get(0))
            .optional()?;
        Ok(property_id.ok_or(AccessError::NotFound("Room"))?)
    }

    fn chore_room_id(&self, chore_id: i64) -> Result<i64> {
        let room_id: Option<i64> = self
            .conn
            .query_row("SELECT room_id FROM chore WHERE id = ?1", [chore_id], |row| row.get(0))
            .optional()?;
        Ok(room_id.ok_or(AccessError::NotFound("Chore"))?)
    }

    /// # Errors
    /// `NotFound("Room")` if the room does not exist.
    pub fn user_has_access_to_room(&self, user: &User, room_id: i64) -> Result<bool> {
        let property_id = self.room_property_id(room_id)?;
        self.user_has_access_to_property(user, property_id)
    }

    /// # Errors
    /// `NotFound("Chore")` if the chore does not exist.
    pub fn user_has_access_to_chore(&self, user: &User, chore_id: i64) -> Result<bool> {
        let room_id = self.chore_room_id(chore_id)?;
        self.user_has_access_to_room(user, room_id)
    }

    fn ensure_property_access(&self, user: &User, property_id: i64) -> Result<()> {
        if !self.user_has_access_to_property(user, property_id)? {
            return Err(AccessError::Unauthorized("property").into());
        }
        Ok(())
    }

    fn ensure_room_access(&self, user: &User, room_id: i64) -> Result<()> {
        if !self.user_has_access_to_room(user, room_id)? {
            return Err(AccessError::Unauthorized("room").into());
        }
        Ok(())
    }

    fn ensure_chore_access(&self, user: &User, chore_id: i64) -> Result<()> {
        if !self.user_has_access_to_chore(user, chore_id)? {
            return Err(AccessError::Unauthorized("chore").into());
        }
        Ok(())
    }

    /// Check membership of the property, then that the room belongs to it.
    pub fn assert_room_in_property(
        &self,
        user: &User,
        property_id: i64,
        room_id: i64,
    ) -> Result<()> {
        self.ensure_property_access(user, property_id)?;
        if self.room_property_id(room_id)? != property_id {
            return Err(AccessError::NotFound("Room").into());
        }
        Ok(())
    }

    pub fn assert_chore_in_room(
        &self,
        user: &User,
        property_id: i64,
        room_id: i64,
        chore_id: i64,
    ) -> Result<()> {
        self.assert_room_in_property(user, property_id, room_id)?;
        if self.chore_room_id(chore_id)? != room_id {
            return Err(AccessError::NotFound("Chore").into());
        }
        Ok(())
    }

    // ── Properties ──────────────────────────────────────────────────────

    fn property_by_id(&self, id: i64) -> Result<Property> {
        let sql = format!("SELECT {PROPERTY_COLUMNS} FROM property p WHERE p.id = ?1");
        let property = self.conn.query_row(&sql, [id], row_to_property).optional()?;
        Ok(property.ok_or(AccessError::NotFound("Property"))?)
    }

    /// Create a property. The owner becomes its first member.
    pub fn create_property(
        &self,
        owner: &User,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Property> {
        let name = clean_name("property name", name)?;
        let ts = format_ts(now);

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO property (name, created_at) VALUES (?1, ?2)",
            params![name, ts],
        )?;
        let id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO user_to_property (user_id, property_id, created_at) VALUES (?1, ?2, ?3)",
            params![owner.id, id, ts],
        )?;
        tx.commit()?;
        tracing::debug!(property_id = id, owner = %owner.id, "created property");

        self.property_by_id(id)
    }

    pub fn list_properties_for_user(&self, user: &User) -> Result<Vec<Property>> {
        let sql = format!(
            "SELECT {PROPERTY_COLUMNS} FROM property p
             JOIN user_to_property up ON up.property_id = p.id
             WHERE up.user_id = ?1
             ORDER BY p.created_at, p.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([&user.id], row_to_property)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn get_property(&self, user: &User, property_id: i64) -> Result<Property> {
        self.ensure_property_access(user, property_id)?;
        self.property_by_id(property_id)
    }

    pub fn rename_property(&self, user: &User, property_id: i64, name: &str) -> Result<Property> {
        self.ensure_property_access(user, property_id)?;
        let name = clean_name("property name", name)?;
        self.conn.execute(
            "UPDATE property SET name = ?1 WHERE id = ?2",
            params![name, property_id],
        )?;
        tracing::debug!(property_id, %name, "renamed property");
        self.property_by_id(property_id)
    }

    /// Delete a property with all of its rooms, chores, history and invites.
    pub fn delete_property(&self, user: &User, property_id: i64) -> Result<()> {
        self.ensure_property_access(user, property_id)?;
        self.conn.execute("DELETE FROM property WHERE id = ?1", [property_id])?;
        tracing::debug!(property_id, "deleted property");
        Ok(())
    }

    pub fn property_members(&self, user: &User, property_id: i64) -> Result<Vec<User>> {
        self.ensure_property_access(user, property_id)?;
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u
             JOIN user_to_property up ON up.user_id = u.id
             WHERE up.property_id = ?1
             ORDER BY up.created_at, u.email"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([property_id], row_to_user)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // ── Rooms ───────────────────────────────────────────────────────────

    fn room_by_id(&self, id: i64) -> Result<Room> {
        let sql = format!("SELECT {ROOM_COLUMNS} FROM room r WHERE r.id = ?1");
        let room = self.conn.query_row(&sql, [id], row_to_room).optional()?;
        Ok(room.ok_or(AccessError::NotFound("Room"))?)
    }

    pub fn create_room(
        &self,
        user: &User,
        property_id: i64,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Room> {
        self.ensure_property_access(user, property_id)?;
        let name = clean_name("room name", name)?;
        self.conn.execute(
            "INSERT INTO room (property_id, name, points, created_at) VALUES (?1, ?2, '[]', ?3)",
            params![property_id, name, format_ts(now)],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(room_id = id, property_id, "created room");
        self.room_by_id(id)
    }

    pub fn list_rooms(&self, user: &User, property_id: i64) -> Result<Vec<Room>> {
        self.ensure_property_access(user, property_id)?;
        let sql =
            format!("SELECT {ROOM_COLUMNS} FROM room r WHERE r.property_id = ?1 ORDER BY r.id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([property_id], row_to_room)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn get_room(&self, user: &User, room_id: i64) -> Result<Room> {
        self.ensure_room_access(user, room_id)?;
        self.room_by_id(room_id)
    }

    pub fn rename_room(&self, user: &User, room_id: i64, name: &str) -> Result<Room> {
        self.ensure_room_access(user, room_id)?;
        let name = clean_name("room name", name)?;
        self.conn.execute("UPDATE room SET name = ?1 WHERE id = ?2", params![name, room_id])?;
        tracing::debug!(room_id, %name, "renamed room");
        self.room_by_id(room_id)
    }

    pub fn delete_room(&self, user: &User, room_id: i64) -> Result<()> {
        self.ensure_room_access(user, room_id)?;
        self.conn.execute("DELETE FROM room WHERE id = ?1", [room_id])?;
        tracing::debug!(room_id, "deleted room");
        Ok(())
    }

    /// The property's floor plan. Rooms that were never drawn are left out.
    pub fn load_floorplan(&self, user: &User, property_id: i64) -> Result<PropertyFloorplan> {
        let property = self.get_property(user, property_id)?;
        let rooms = self
            .list_rooms(user, property_id)?
            .into_iter()
            .filter(|room| room.points.len() >= MIN_ROOM_POINTS)
            .map(|room| RoomShape {
                id: room.id.to_string(),
                name: room.name,
                points: room.points,
            })
            .collect();
        Ok(PropertyFloorplan {
            rooms,
            aspect_ratio: property.aspect_ratio.unwrap_or(DEFAULT_ASPECT_RATIO),
        })
    }

    /// Save an edited floor plan in one transaction.
    ///
    /// Shapes with a stored id update that room; any other id creates a new
    /// room. `deleted_room_ids` are removed first. Nothing is written if any
    /// shape is invalid or refers to a room of another property.
    pub fn save_floorplan(
        &self,
        user: &User,
        property_id: i64,
        plan: &PropertyFloorplan,
        deleted_room_ids: &[i64],
        now: DateTime<Utc>,
    ) -> Result<Vec<Room>> {
        self.ensure_property_access(user, property_id)?;
        plan.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE property SET aspect_ratio = ?1 WHERE id = ?2",
            params![plan.aspect_ratio, property_id],
        )?;

        for room_id in deleted_room_ids {
            tx.execute(
                "DELETE FROM room WHERE id = ?1 AND property_id = ?2",
                params![room_id, property_id],
            )?;
        }

        for shape in &plan.rooms {
            let name = clean_name("room name", &shape.name)?;
            let points = serde_json::to_string(&shape.points)?;
            match shape.stored_id() {
                Some(room_id) => {
                    let updated = tx.execute(
                        "UPDATE room SET name = ?1, points = ?2 WHERE id = ?3 AND property_id = ?4",
                        params![name, points, room_id, property_id],
                    )?;
                    if updated == 0 {
                        return Err(AccessError::NotFound("Room").into());
                    }
                }
                None => {
                    tx.execute(
                        "INSERT INTO room (property_id, name, points, created_at) VALUES (?1, ?2, ?3, ?4)",
                        params![property_id, name, points, format_ts(now)],
                    )?;
                }
            }
        }

        tx.commit()?;
        tracing::debug!(
            property_id,
            rooms = plan.rooms.len(),
            deleted = deleted_room_ids.len(),
            "saved floor plan"
        );

        self.list_rooms(user, property_id)
    }

    // ── Chores ──────────────────────────────────────────────────────────

    fn chore_by_id(&self, id: i64) -> Result<Chore> {
        let sql = format!("SELECT {CHORE_COLUMNS} FROM chore c WHERE c.id = ?1");
        let chore = self.conn.query_row(&sql, [id], row_to_chore).optional()?;
        Ok(chore.ok_or(AccessError::NotFound("Chore"))?)
    }

    pub fn create_chore(
        &self,
        user: &User,
        room_id: i64,
        name: &str,
        frequency: Frequency,
        now: DateTime<Utc>,
    ) -> Result<Chore> {
        self.ensure_room_access(user, room_id)?;
        let name = clean_name("chore name", name)?;
        let ts = format_ts(now);
        self.conn.execute(
            "INSERT INTO chore (room_id, name, frequency, frequency_unit, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![room_id, name, frequency.every(), frequency.unit().as_str(), ts],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(chore_id = id, room_id, %name, "created chore");
        self.chore_by_id(id)
    }

    pub fn update_chore(
        &self,
        user: &User,
        chore_id: i64,
        name: &str,
        frequency: Frequency,
        now: DateTime<Utc>,
    ) -> Result<Chore> {
        self.ensure_chore_access(user, chore_id)?;
        let name = clean_name("chore name", name)?;
        self.conn.execute(
            "UPDATE chore SET name = ?1, frequency = ?2, frequency_unit = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                name,
                frequency.every(),
                frequency.unit().as_str(),
                format_ts(now),
                chore_id
            ],
        )?;
        tracing::debug!(chore_id, %name, "updated chore");
        self.chore_by_id(chore_id)
    }

    pub fn delete_chore(&self, user: &User, chore_id: i64) -> Result<()> {
        self.ensure_chore_access(user, chore_id)?;
        self.conn.execute("DELETE FROM chore WHERE id = ?1", [chore_id])?;
        tracing::debug!(chore_id, "deleted chore");
        Ok(())
    }

    pub fn get_chore(&self, user: &User, chore_id: i64) -> Result<Chore> {
        self.ensure_chore_access(user, chore_id)?;
        self.chore_by_id(chore_id)
    }

    pub fn list_chores_for_room(&self, user: &User, room_id: i64) -> Result<Vec<Chore>> {
        self.ensure_room_access(user, room_id)?;
        let sql = format!("SELECT {CHORE_COLUMNS} FROM chore c WHERE c.room_id = ?1 ORDER BY c.id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([room_id], row_to_chore)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn list_chores_for_property(&self, user: &User, property_id: i64) -> Result<Vec<Chore>> {
        self.ensure_property_access(user, property_id)?;
        let sql = format!(
            "SELECT {CHORE_COLUMNS} FROM chore c
             JOIN room r ON r.id = c.room_id
             WHERE r.property_id = ?1
             ORDER BY c.room_id, c.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([property_id], row_to_chore)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // ── Completion history ──────────────────────────────────────────────

    /// Append a completion. `completed_at` is usually "now" but may be a
    /// debug date chosen by an admin.
    pub fn mark_chore_done(
        &self,
        user: &User,
        chore_id: i64,
        completed_at: DateTime<Utc>,
    ) -> Result<ChoreCompletion> {
        self.ensure_chore_access(user, chore_id)?;
        self.conn.execute(
            "INSERT INTO chore_history (chore_id, user_id, completed_at) VALUES (?1, ?2, ?3)",
            params![chore_id, user.id, format_ts(completed_at)],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(chore_id, user_id = %user.id, %completed_at, "marked chore done");

        let sql = format!("SELECT {COMPLETION_COLUMNS} FROM chore_history h WHERE h.id = ?1");
        Ok(self.conn.query_row(&sql, [id], row_to_completion)?)
    }

    pub fn last_completed_at(&self, user: &User, chore_id: i64) -> Result<Option<DateTime<Utc>>> {
        self.ensure_chore_access(user, chore_id)?;
        let last: Option<String> = self.conn.query_row(
            "SELECT MAX(completed_at) FROM chore_history WHERE chore_id = ?1",
            [chore_id],
            |row| row.get(0),
        )?;
        Ok(last.map(|raw| parse_ts(0, &raw)).transpose()?)
    }

    /// Completions of a chore, newest first.
    pub fn completion_history(&self, user: &User, chore_id: i64) -> Result<Vec<ChoreCompletion>> {
        self.ensure_chore_access(user, chore_id)?;
        let sql = format!(
            "SELECT {COMPLETION_COLUMNS} FROM chore_history h
             WHERE h.chore_id = ?1
             ORDER BY h.completed_at DESC, h.id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([chore_id], row_to_completion)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Wipe a chore's history so it reads as never done. Admin only.
    pub fn clear_chore_history(&self, user: &User, chore_id: i64) -> Result<usize> {
        if !user.is_admin() {
            return Err(AccessError::NotAdmin.into());
        }
        self.ensure_chore_access(user, chore_id)?;
        let removed = self
            .conn
            .execute("DELETE FROM chore_history WHERE chore_id = ?1", [chore_id])?;
        tracing::debug!(chore_id, removed, "cleared chore history");
        Ok(removed)
    }

    // ── Invites ─────────────────────────────────────────────────────────

    /// Invite `email` to a property the user belongs to.
    ///
    /// Returns the stored invite and the property, which the caller needs to
    /// compose the invitation email.
    pub fn create_invite(
        &self,
        user: &User,
        property_id: i64,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<(Invite, Property)> {
        let property = self.get_property(user, property_id)?;
        let email = validate_email(email)?;
        let token = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO invite (id, property_id, inviting_user_id, invited_user_email, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![token, property_id, user.id, email, format_ts(now)],
        )?;
        tracing::debug!(property_id, invited = %email, "created invite");

        let sql = format!("SELECT {INVITE_COLUMNS} FROM invite i WHERE i.id = ?1");
        let invite = self.conn.query_row(&sql, [&token], row_to_invite)?;
        Ok((invite, property))
    }

    /// Look up an invite addressed to `user`.
    ///
    /// # Errors
    /// `NotFound("Invitation")` for unknown tokens and for invites sent to a
    /// different address.
    pub fn get_invite_for(&self, user: &User, token: &str) -> Result<(Invite, Property)> {
        let sql = format!(
            "SELECT {INVITE_COLUMNS} FROM invite i WHERE i.id = ?1 AND i.invited_user_email = ?2"
        );
        let invite = self
            .conn
            .query_row(&sql, params![token, user.email.to_ascii_lowercase()], row_to_invite)
            .optional()?
            .ok_or(AccessError::NotFound("Invitation"))?;
        let property = self.property_by_id(invite.property_id)?;
        Ok((invite, property))
    }

    /// Invites waiting for `user` to accept or ignore.
    pub fn pending_invites(&self, user: &User) -> Result<Vec<(Invite, Property)>> {
        let sql = format!(
            "SELECT {INVITE_COLUMNS}, {PROPERTY_COLUMNS} FROM invite i
             JOIN property p ON p.id = i.property_id
             WHERE i.invited_user_email = ?1
             ORDER BY i.created_at"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([user.email.to_ascii_lowercase()], |row| {
            let invite = row_to_invite(row)?;
            let created_at: String = row.get(8)?;
            let property = Property {
                id: row.get(5)?,
                name: row.get(6)?,
                aspect_ratio: row.get(7)?,
                created_at: parse_ts(8, &created_at)?,
            };
            Ok((invite, property))
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Join the invited property and consume the invite.
    pub fn accept_invite(&self, user: &User, token: &str, now: DateTime<Utc>) -> Result<Property> {
        let (invite, property) = self.get_invite_for(user, token)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT OR IGNORE INTO user_to_property (user_id, property_id, created_at)
             VALUES (?1, ?2, ?3)",
            params![user.id, invite.property_id, format_ts(now)],
        )?;
        tx.execute("DELETE FROM invite WHERE id = ?1", [&invite.token])?;
        tx.commit()?;
        tracing::debug!(property_id = invite.property_id, user_id = %user.id, "accepted invite");

        Ok(property)
    }

    pub fn ignore_invite(&self, user: &User, token: &str) -> Result<()> {
        let removed = self.conn.execute(
            "DELETE FROM invite WHERE id = ?1 AND invited_user_email = ?2",
            params![token, user.email.to_ascii_lowercase()],
        )?;
        if removed == 0 {
            return Err(AccessError::NotFound("Invitation").into());
        }
        tracing::debug!(user_id = %user.id, "ignored invite");
        Ok(())
    }

    // ── Views ───────────────────────────────────────────────────────────

    /// Chores joined with their latest completion. `filter` binds `?1`.
    fn chore_statuses(
        &self,
        filter: &str,
        id: i64,
        now: DateTime<Utc>,
        final_week_days: u32,
    ) -> Result<Vec<ChoreStatus>> {
        let sql = format!(
            "SELECT {CHORE_COLUMNS}, MAX(h.completed_at) FROM chore c
             LEFT JOIN chore_history h ON h.chore_id = c.id
             {filter}
             GROUP BY c.id
             ORDER BY c.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([id], |row| {
            let chore = row_to_chore(row)?;
            let last: Option<String> = row.get(7)?;
            let last = last.map(|raw| parse_ts(7, &raw)).transpose()?;
            Ok((chore, last))
        })?;

        let mut statuses = Vec::new();
        for row in rows {
            let (chore, last) = row?;
            statuses.push(ChoreStatus::new(chore, last, now, final_week_days));
        }
        Ok(statuses)
    }

    /// Progress of every chore in a room at `now`.
    pub fn room_statuses(
        &self,
        user: &User,
        room_id: i64,
        now: DateTime<Utc>,
        final_week_days: u32,
    ) -> Result<Vec<ChoreStatus>> {
        self.ensure_room_access(user, room_id)?;
        self.chore_statuses("WHERE c.room_id = ?1", room_id, now, final_week_days)
    }

    /// Every room of a property colored by its most urgent chore.
    pub fn property_overview(
        &self,
        user: &User,
        property_id: i64,
        now: DateTime<Utc>,
        final_week_days: u32,
    ) -> Result<Vec<RoomOverview>> {
        let rooms = self.list_rooms(user, property_id)?;
        let statuses = self.chore_statuses(
            "JOIN room r ON r.id = c.room_id WHERE r.property_id = ?1",
            property_id,
            now,
            final_week_days,
        )?;

        Ok(rooms
            .into_iter()
            .map(|room| {
                let urgency = room_urgency(
                    statuses
                        .iter()
                        .filter(|s| s.chore.room_id == room.id)
                        .map(|s| &s.progress),
                );
                RoomOverview { room, urgency }
            })
            .collect())
    }
}
