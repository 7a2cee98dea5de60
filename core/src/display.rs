//! Backend enum codes rendered as Vietnamese labels.
//!
//! Each table is a fixed list of `(code, label)` pairs known at compile time.
//! Lookups never fail: an unknown code renders as itself so a backend that
//! grows a new value still shows something meaningful.

/// Rendered for absent or empty values.
pub const EMPTY_PLACEHOLDER: &str = "-";

/// A named, immutable code-to-label table.
#[derive(Debug)]
pub struct DisplayMap {
    name: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

impl DisplayMap {
    const fn new(name: &'static str, entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn label(&self, code: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, label)| *label)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.label(code).is_some()
    }

    pub fn codes(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|(code, _)| *code)
    }

    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }
}

/// Account state.
pub static STATE: DisplayMap = DisplayMap::new(
    "state",
    &[
        ("ACTIVE", "Hoạt động"),
        ("INACTIVE", "Ngừng hoạt động"),
        ("PENDING", "Chờ kích hoạt"),
        ("LOCKED", "Đã khóa"),
    ],
);

pub static ROLE: DisplayMap = DisplayMap::new(
    "role",
    &[
        ("RESIDENT", "Cư dân"),
        ("ADMIN", "Quản trị viên"),
        ("ACCOUNTANT", "Kế toán"),
    ],
);

pub static HOUSEHOLD_STATUS: DisplayMap = DisplayMap::new(
    "household-status",
    &[
        ("PENDING", "Chờ duyệt"),
        ("ACTIVE", "Đang hoạt động"),
        ("REJECTED", "Bị từ chối"),
        ("MOVED", "Đã chuyển đi"),
        ("SPLIT", "Đã tách hộ"),
    ],
);

/// Verification state of a resident's declared information.
pub static INFORMATION_STATUS: DisplayMap = DisplayMap::new(
    "information-status",
    &[
        ("PENDING", "Chờ xác minh"),
        ("VERIFIED", "Đã xác minh"),
        ("REJECTED", "Không hợp lệ"),
    ],
);

pub static GENDER: DisplayMap = DisplayMap::new(
    "gender",
    &[("MALE", "Nam"), ("FEMALE", "Nữ"), ("OTHER", "Khác")],
);

/// Relationship of a member to the head of household.
pub static RELATIONSHIP: DisplayMap = DisplayMap::new(
    "relationship",
    &[
        ("HEAD", "Chủ hộ"),
        ("SPOUSE", "Vợ/Chồng"),
        ("CHILD", "Con"),
        ("PARENT", "Bố/Mẹ"),
        ("SIBLING", "Anh/Chị/Em"),
        ("GRANDPARENT", "Ông/Bà"),
        ("GRANDCHILD", "Cháu"),
        ("OTHER", "Khác"),
    ],
);

pub static RESIDENCE_STATUS: DisplayMap = DisplayMap::new(
    "residence-status",
    &[
        ("PERMANENT", "Thường trú"),
        ("TEMPORARY", "Tạm trú"),
        ("TEMPORARILY_ABSENT", "Tạm vắng"),
        ("MOVED_OUT", "Đã chuyển đi"),
        ("DECEASED", "Đã qua đời"),
    ],
);

pub static ALL: [&DisplayMap; 7] = [
    &STATE,
    &ROLE,
    &HOUSEHOLD_STATUS,
    &INFORMATION_STATUS,
    &GENDER,
    &RELATIONSHIP,
    &RESIDENCE_STATUS,
];

pub fn by_name(name: &str) -> Option<&'static DisplayMap> {
    ALL.iter().copied().find(|map| map.name == name)
}

/// Label for `value` in `map`.
///
/// Returns `"-"` for `None` or `""`, the mapped label for a known code, and
/// `value` itself for anything else.
pub fn display_value<'a>(value: Option<&'a str>, map: &DisplayMap) -> &'a str {
    match value {
        None | Some("") => EMPTY_PLACEHOLDER,
        Some(code) => map.label(code).unwrap_or(code),
    }
}
