//! services/seeder/src/report.rs
//!
//! Plain-text renderings of the user directory.

use std::path::Path;

use lms_seed_core::directory::role_counts;
use lms_seed_core::UserSummary;

pub const DEFAULT_EXPORT_PATH: &str = "users_export.txt";

const NAME_WIDTH: usize = 18;
const EMAIL_WIDTH: usize = 23;

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

fn role_of(user: &UserSummary) -> &'static str {
    user.role.map_or("N/A", |r| r.as_str())
}

fn id_of(user: &UserSummary) -> &str {
    or_na(user.id.as_ref().map(|id| id.as_str()))
}

/// Cuts `value` to `width` characters and marks the cut with `..`.
fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        let mut cut: String = value.chars().take(width).collect();
        cut.push_str("..");
        cut
    } else {
        value.to_string()
    }
}

/// One block per user with every known field.
pub fn render_details(users: &[UserSummary]) -> String {
    if users.is_empty() {
        return "No users found\n".to_string();
    }

    let mut out = format!("Found {} user(s):\n{}\n", users.len(), "=".repeat(80));
    for (i, user) in users.iter().enumerate() {
        out.push_str(&format!("{:2}. {}\n", i + 1, or_na(user.name.as_deref())));
        out.push_str(&format!("    Email: {}\n", or_na(user.email.as_deref())));
        out.push_str(&format!("    Role: {}\n", role_of(user)));
        out.push_str(&format!("    ID: {}\n", id_of(user)));
        if let Some(created) = user.created_at {
            out.push_str(&format!("    Created: {}\n", created.format("%Y-%m-%d %H:%M:%S")));
        }
        out.push('\n');
    }
    out
}

fn table_row(no: &str, name: &str, email: &str, role: &str, id: &str) -> String {
    format!("{:<4} {:<20} {:<25} {:<10} {:<20}\n", no, name, email, role, id)
}

/// Fixed-width table, long names and emails truncated.
pub fn render_table(users: &[UserSummary]) -> String {
    if users.is_empty() {
        return "No users found\n".to_string();
    }

    let mut out = format!("Users Table ({} users):\n{}\n", users.len(), "=".repeat(90));
    out.push_str(&table_row("No.", "Name", "Email", "Role", "User ID"));
    out.push_str(&"-".repeat(90));
    out.push('\n');
    for (i, user) in users.iter().enumerate() {
        out.push_str(&table_row(
            &(i + 1).to_string(),
            &truncate(or_na(user.name.as_deref()), NAME_WIDTH),
            &truncate(or_na(user.email.as_deref()), EMAIL_WIDTH),
            role_of(user),
            id_of(user),
        ));
    }
    out
}

pub fn render_role_stats(users: &[UserSummary]) -> String {
    let mut out = String::from("User Statistics:\n");
    for (role, count) in role_counts(users) {
        let mut label = role;
        if let Some(first) = label.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        out.push_str(&format!("   {}: {} user(s)\n", label, count));
    }
    out
}

/// The contents written by `export_users`.
pub fn render_export(users: &[UserSummary]) -> String {
    let mut out = format!("Users Export - {} users\n{}\n\n", users.len(), "=".repeat(50));
    for user in users {
        out.push_str(&format!("Name: {}\n", or_na(user.name.as_deref())));
        out.push_str(&format!("Email: {}\n", or_na(user.email.as_deref())));
        out.push_str(&format!("Role: {}\n", role_of(user)));
        out.push_str(&format!("ID: {}\n", id_of(user)));
        if let Some(created) = user.created_at {
            out.push_str(&format!("Created: {}\n", created.to_rfc3339()));
        }
        out.push_str(&"-".repeat(30));
        out.push('\n');
    }
    out
}

pub fn export_users(users: &[UserSummary], path: &Path) -> std::io::Result<()> {
    std::fs::write(path, render_export(users))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_seed_core::{Role, UserId};

    fn user(name: &str, email: &str, role: Option<Role>) -> UserSummary {
        UserSummary {
            id: Some(UserId::from("691a7fb4cf1b0ee3f7731207")),
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            role,
            created_at: None,
        }
    }

    #[test]
    fn long_names_and_emails_are_truncated() {
        assert_eq!(truncate("Short", NAME_WIDTH), "Short");
        assert_eq!(
            truncate("Bartholomew Montgomery-Smythe", NAME_WIDTH),
            "Bartholomew Montgo.."
        );
        assert_eq!(truncate(&"x".repeat(23), EMAIL_WIDTH), "x".repeat(23));
    }

    #[test]
    fn table_has_one_row_per_user() {
        let users = vec![
            user("Ana", "ana@test.com", Some(Role::Admin)),
            user("Bartholomew Montgomery-Smythe", "bartholomew.montgomery@school.edu", None),
        ];
        let table = render_table(&users);
        assert!(table.contains("Bartholomew Montgo.."));
        assert!(table.contains("bartholomew.montgomery@.."));
        assert_eq!(table.lines().filter(|l| l.contains("691a7fb4")).count(), 2);
    }

    #[test]
    fn stats_capitalize_roles() {
        let users = vec![
            user("Ana", "ana@test.com", Some(Role::Student)),
            user("Luis", "luis@test.com", None),
        ];
        let stats = render_role_stats(&users);
        assert!(stats.contains("Student: 1 user(s)"));
        assert!(stats.contains("Unknown: 1 user(s)"));
    }

    #[test]
    fn export_lists_every_field_per_user() {
        let users = vec![user("Ana", "ana@test.com", Some(Role::Admin))];
        let export = render_export(&users);
        assert!(export.starts_with("Users Export - 1 users\n"));
        assert!(export.contains("Name: Ana\nEmail: ana@test.com\nRole: admin\nID: 691a7fb4cf1b0ee3f7731207\n"));
        assert!(export.ends_with(&format!("{}\n", "-".repeat(30))));

        let table = render_table(&users);
        assert_eq!(table.lines().nth(1).map(str::len), Some(90));
        assert!(table.lines().nth(2).unwrap().starts_with("No.  Name"));
    }

    #[test]
    fn empty_lists_say_so() {
        assert_eq!(render_details(&[]), "No users found\n");
        assert_eq!(render_table(&[]), "No users found\n");
    }
}
