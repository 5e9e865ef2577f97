//! # Repository Module
//!
//! Database repository implementations for Grocer.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Presentation layer                                                    │
//! │       │                                                                 │
//! │       │  db.items().add_item(&item)                                    │
//! │       ▼                                                                 │
//! │  ItemRepository                                                        │
//! │  ├── add_item(&self, item)                                             │
//! │  ├── list_items(&self)                                                 │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database (items)                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ItemRepository`](item::ItemRepository) - Grocery item insert and listing

pub mod item;
