#![allow(dead_code)]

use chrono::NaiveDate;
use stacks_core::{NewBook, NewUser, Role};
use stacks_db::{Database, DbConfig};

pub async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn add_book(
    db: &Database,
    isbn: &str,
    title: &str,
    subject: &str,
    authors: &[(&str, &str)],
    quantity: i64,
) {
    db.catalog()
        .insert_book(&NewBook {
            isbn: isbn.to_string(),
            title: title.to_string(),
            subject: subject.to_string(),
            date_published: date(2000, 1, 1),
            authors: authors
                .iter()
                .map(|(f, l)| (f.to_string(), l.to_string()))
                .collect(),
            quantity,
        })
        .await
        .unwrap();
}

/// Inserts a patron directly, skipping credential hashing.
pub async fn add_patron(db: &Database, email: &str, last_name: &str) {
    db.users()
        .insert(
            &NewUser {
                email: email.to_string(),
                first_name: "Pat".to_string(),
                last_name: last_name.to_string(),
                dob: date(1990, 1, 1),
                credential: String::new(),
            },
            Role::Patron,
            "unused",
        )
        .await
        .unwrap();
}

pub async fn quantity(db: &Database, isbn: &str) -> i64 {
    db.catalog().inventory(isbn).await.unwrap().quantity
}
