//! Plain-text views of households and residents, with enum codes shown as
//! their Vietnamese labels.

use std::fmt::Write;

use household_core::display::{self, display_value};
use household_core::{Household, Resident};

const MEMBER_HEADER: [&str; 7] = [
    "ID",
    "Họ tên",
    "Giới tính",
    "Quan hệ",
    "Cư trú",
    "Thông tin",
    "Ngày sinh",
];

pub fn resident_row(resident: &Resident) -> String {
    row([
        resident.id.to_string().as_str(),
        resident.name.as_str(),
        display_value(resident.gender.as_deref(), &display::GENDER),
        display_value(resident.relationship.as_deref(), &display::RELATIONSHIP),
        display_value(resident.residence_status.as_deref(), &display::RESIDENCE_STATUS),
        display_value(resident.information_status.as_deref(), &display::INFORMATION_STATUS),
        resident.date_of_birth.as_deref().unwrap_or(display::EMPTY_PLACEHOLDER),
    ])
}

pub fn members_table(members: &[Resident]) -> String {
    let mut out = row(MEMBER_HEADER);
    for member in members {
        out.push('\n');
        out.push_str(&resident_row(member));
    }
    out
}

pub fn household_summary(household: &Household) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Mã hộ:      {}", household.id);
    let _ = writeln!(
        out,
        "Tên hộ:     {}",
        household.name.as_deref().unwrap_or(display::EMPTY_PLACEHOLDER)
    );
    let _ = writeln!(
        out,
        "Địa chỉ:    {}",
        household.address.as_deref().unwrap_or(display::EMPTY_PLACEHOLDER)
    );
    let _ = writeln!(
        out,
        "Trạng thái: {}",
        display_value(household.status.as_deref(), &display::HOUSEHOLD_STATUS)
    );
    if !household.members.is_empty() {
        out.push('\n');
        out.push_str(&members_table(&household.members));
    }
    out.trim_end().to_string()
}

/// One line per household, for the admin listing.
pub fn households_table(households: &[Household]) -> String {
    let mut out = String::from("ID\tTrạng thái\tSố nhân khẩu\tTên hộ");
    for household in households {
        let _ = write!(
            out,
            "\n{}\t{}\t{}\t{}",
            household.id,
            display_value(household.status.as_deref(), &display::HOUSEHOLD_STATUS),
            household.members.len(),
            household.name.as_deref().unwrap_or(display::EMPTY_PLACEHOLDER),
        );
    }
    out
}

fn row<const N: usize>(cells: [&str; N]) -> String {
    cells.join("\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resident(value: serde_json::Value) -> Resident {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn resident_row_uses_labels() {
        let r = resident(json!({
            "id": 3,
            "name": "Đỗ Thị Mai",
            "gender": "FEMALE",
            "relationship": "SPOUSE",
            "residenceStatus": "TEMPORARY",
            "informationStatus": "VERIFIED",
            "dateOfBirth": "1988-12-01"
        }));
        assert_eq!(
            resident_row(&r),
            "3\tĐỗ Thị Mai\tNữ\tVợ/Chồng\tTạm trú\tĐã xác minh\t1988-12-01"
        );
    }

    #[test]
    fn missing_and_unknown_codes_still_render() {
        let r = resident(json!({"id": 4, "name": "Bùi Văn K", "relationship": "COUSIN"}));
        assert_eq!(resident_row(&r), "4\tBùi Văn K\t-\tCOUSIN\t-\t-\t-");
    }

    #[test]
    fn members_table_starts_with_header() {
        let members = vec![resident(json!({"id": 1, "name": "A", "relationship": "HEAD"}))];
        let table = members_table(&members);
        let mut lines = table.lines();
        assert!(lines.next().unwrap().starts_with("ID\tHọ tên"));
        assert!(lines.next().unwrap().contains("Chủ hộ"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn household_summary_shows_status_label() {
        let household: Household = serde_json::from_value(json!({
            "id": 9,
            "name": "Hộ bà Mai",
            "address": "3 Trần Phú",
            "status": "ACTIVE"
        }))
        .unwrap();
        let summary = household_summary(&household);
        assert!(summary.contains("Hộ bà Mai"));
        assert!(summary.contains("Trạng thái: Đang hoạt động"));
        assert!(!summary.contains("Họ tên"), "no member table without members");
    }

    #[test]
    fn households_table_counts_members() {
        let households: Vec<Household> = serde_json::from_value(json!([
            {"id": 1, "name": "Hộ A", "status": "PENDING", "members": [{"id": 2, "name": "A"}]},
            {"id": 5, "status": "SOMETHING_NEW"}
        ]))
        .unwrap();
        let table = households_table(&households);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[1], "1\tChờ duyệt\t1\tHộ A");
        assert_eq!(lines[2], "5\tSOMETHING_NEW\t0\t-");
    }
}
