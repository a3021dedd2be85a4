//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Recipe categories ("Dessert", "Seafood").
    categories (id) {
        /// Primary key: 24-character hex identifier.
        id -> Varchar,
        /// Display name, matched case-insensitively by the importer.
        name -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Cuisine regions ("Italian", "Mexican").
    areas (id) {
        /// Primary key: 24-character hex identifier.
        id -> Varchar,
        /// Display name, matched case-insensitively by the importer.
        name -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ingredient catalogue.
    ingredients (id) {
        /// Primary key: 24-character hex identifier.
        id -> Varchar,
        /// Ingredient name.
        name -> Text,
        /// Optional image URL.
        image -> Nullable<Text>,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// User accounts with their follow graph stored as identifier arrays.
    users (id) {
        /// Primary key: 24-character hex identifier.
        id -> Varchar,
        /// Display name.
        name -> Text,
        /// Email address.
        email -> Text,
        /// bcrypt password hash.
        password_hash -> Text,
        /// Optional avatar URL.
        avatar -> Nullable<Text>,
        /// Identifiers of users following this user.
        followers -> Array<Text>,
        /// Identifiers of users this user follows.
        following -> Array<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recipes. References are stored as identifiers without foreign keys.
    recipes (id) {
        /// Primary key: 24-character hex identifier.
        id -> Varchar,
        /// Title (max 100 characters).
        title -> Varchar,
        /// Description (max 1000 characters).
        description -> Varchar,
        /// Preparation steps (max 5000 characters).
        instructions -> Varchar,
        /// Optional image URL.
        image -> Nullable<Text>,
        /// Cooking time in minutes, at least 1 when present.
        cooking_time -> Nullable<Int4>,
        /// Category identifier.
        category_id -> Varchar,
        /// Area identifier.
        area_id -> Varchar,
        /// Author identifier.
        author_id -> Varchar,
        /// `[{ingredientRef, name, measure}]` entries in fixture order.
        ingredients -> Jsonb,
        /// Identifiers of users who favourited the recipe.
        favorited_by -> Array<Text>,
        /// Creation timestamp; listings sort on it, newest first.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Site testimonials.
    testimonials (id) {
        /// Primary key: 24-character hex identifier.
        id -> Varchar,
        /// Testimonial text (max 500 characters).
        text -> Varchar,
        /// Display name shown with the testimonial.
        name -> Text,
        /// Optional owning user identifier.
        owner_id -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    categories,
    areas,
    ingredients,
    users,
    recipes,
    testimonials,
);
