//! Kiểu dữ liệu lõi cho lớp đối chiếu và làm sạch bản ghi bệnh viện.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Cấu hình cho quy trình tạo payload cập nhật.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconcileConfig {
    /// Các khóa do server quản lý, luôn bị loại khỏi change-set.
    pub ignored_keys: Vec<String>,
    /// Có chạy bước loại bỏ null/rỗng trước khi gửi hay không.
    pub strip_empty: bool,
    /// Chính sách khi dọn dẹp nhiều tệp đính kèm.
    pub cleanup_policy: CleanupPolicy,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            ignored_keys: ["_id", "createdAt", "updatedAt", "__v"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            strip_empty: true,
            cleanup_policy: CleanupPolicy::FailFast,
        }
    }
}

impl ReconcileConfig {
    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignored_keys.iter().any(|ignored| ignored == key)
    }
}

/// Cấu hình một phần (file JSON, đối tượng JS) ghi đè lên giá trị mặc định.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialReconcileConfig {
    #[serde(default)]
    pub ignored_keys: Option<Vec<String>>,
    #[serde(default)]
    pub strip_empty: Option<bool>,
    #[serde(default)]
    pub cleanup_policy: Option<CleanupPolicy>,
}

impl From<PartialReconcileConfig> for ReconcileConfig {
    fn from(cfg: PartialReconcileConfig) -> Self {
        let mut base = ReconcileConfig::default();
        if let Some(keys) = cfg.ignored_keys {
            base.ignored_keys = keys;
        }
        if let Some(strip) = cfg.strip_empty {
            base.strip_empty = strip;
        }
        if let Some(policy) = cfg.cleanup_policy {
            base.cleanup_policy = policy;
        }
        base
    }
}

/// Hành vi khi một thao tác trong chuỗi dọn dẹp thất bại.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CleanupPolicy {
    /// Dừng ngay ở lỗi đầu tiên, các mục sau không được thử.
    #[default]
    FailFast,
    /// Tiếp tục với các mục còn lại và báo cáo mọi lỗi.
    BestEffort,
}

/// Loại bản ghi có thể cập nhật một phần qua REST API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Booking,
    HospitalProfile,
}

impl RecordKind {
    /// Đường dẫn collection tương ứng trên backend.
    pub fn collection(&self) -> &'static str {
        match self {
            RecordKind::Booking => "bookings",
            RecordKind::HospitalProfile => "hospitals",
        }
    }
}

/// Tệp đính kèm đã tải lên blob storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAttachment {
    /// Khóa đối tượng trong blob storage.
    pub key: String,
    pub file_name: String,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pin: String,
}

/// Hồ sơ bệnh viện.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HospitalProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub address: Address,
    #[serde(default)]
    pub bed_count: Option<u32>,
    #[serde(default)]
    pub specialities: Vec<String>,
    #[serde(default)]
    pub documents: Vec<DocumentAttachment>,
}

/// Trạng thái của một lượt đặt giường/nhập viện.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Admitted,
    Discharged,
    ClaimSubmitted,
    BillClosed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Rejected,
    Settled,
}

/// Thông tin bảo hiểm và yêu cầu bồi thường gắn với booking.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceDetails {
    pub provider: String,
    pub policy_number: String,
    #[serde(default)]
    pub claim_amount: Option<f64>,
    #[serde(default)]
    pub claim_status: ClaimStatus,
}

/// Một booking của bệnh nhân.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub patient_name: String,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub admission_date: Option<NaiveDate>,
    #[serde(default)]
    pub discharge_date: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
    /// Giảm giá; 0 là giá trị nghiệp vụ hợp lệ.
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub insurance: Option<InsuranceDetails>,
    #[serde(default)]
    pub documents: Vec<DocumentAttachment>,
}

/// Giữ snapshot (trạng thái server) và bản sao đang chỉnh sửa của một bản ghi.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession<T> {
    snapshot: T,
    working: Option<T>,
}

impl<T: Clone> EditSession<T> {
    /// Tạo phiên từ bản ghi vừa tải về.
    pub fn new(snapshot: T) -> Self {
        Self {
            snapshot,
            working: None,
        }
    }

    pub fn snapshot(&self) -> &T {
        &self.snapshot
    }

    /// Bắt đầu chỉnh sửa. Nếu đang chỉnh sửa thì giữ nguyên bản sao hiện có.
    pub fn begin_edit(&mut self) -> &mut T {
        let snapshot = &self.snapshot;
        self.working.get_or_insert_with(|| snapshot.clone())
    }

    pub fn is_editing(&self) -> bool {
        self.working.is_some()
    }

    pub fn working(&self) -> Result<&T, ReconcileError> {
        self.working.as_ref().ok_or(ReconcileError::NotEditing)
    }

    pub fn working_mut(&mut self) -> Result<&mut T, ReconcileError> {
        self.working.as_mut().ok_or(ReconcileError::NotEditing)
    }

    /// Hủy chỉnh sửa, trả lại bản sao bị loại bỏ (nếu có).
    pub fn cancel(&mut self) -> Option<T> {
        self.working.take()
    }

    /// Ghi nhận trạng thái server mới sau khi lưu thành công.
    pub fn commit(&mut self, snapshot: T) {
        self.snapshot = snapshot;
        self.working = None;
    }

    pub fn into_snapshot(self) -> T {
        self.snapshot
    }
}

/// Một tệp không xóa được trong lượt dọn dẹp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CleanupFailure {
    pub key: String,
    pub message: String,
}

/// Kết quả dọn dẹp tệp đính kèm theo thứ tự đầu vào.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted: Vec<String>,
    pub failed: Vec<CleanupFailure>,
}

impl CleanupReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Lỗi chung của lớp đối chiếu.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReconcileError {
    #[error("Chưa bắt đầu chỉnh sửa bản ghi")]
    NotEditing,
    #[error("Bản ghi phải là JSON object, nhận được {0}")]
    NotAnObject(String),
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Dữ liệu không hợp lệ: {0}")]
    Validation(String),
    #[error("Lỗi API: {0}")]
    Api(String),
    #[error("Không xóa được tệp {key}: {message}")]
    Storage { key: String, message: String },
}
