use serde::{Deserialize, Serialize};

/// Sortable columns exposed to callers. Anything outside this list falls back
/// to relevance, so raw request strings never reach SQL.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
	#[default]
	Relevance,
	CreatedAt,
	UpdatedAt,
	Filename,
	FileSize,
}
impl SortKey {
	pub fn parse(raw: &str) -> Self {
		match raw.trim() {
			"created_at" => Self::CreatedAt,
			"updated_at" => Self::UpdatedAt,
			"filename" => Self::Filename,
			"file_size" => Self::FileSize,
			_ => Self::Relevance,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Relevance => "relevance",
			Self::CreatedAt => "created_at",
			Self::UpdatedAt => "updated_at",
			Self::Filename => "filename",
			Self::FileSize => "file_size",
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
	Asc,
	#[default]
	Desc,
}
impl SortDirection {
	pub fn parse(raw: &str) -> Self {
		match raw.trim() {
			"asc" => Self::Asc,
			_ => Self::Desc,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}
}

/// Pagination envelope computed from the full filtered result count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
	pub page: u32,
	pub per_page: u32,
	pub total_count: u64,
	pub pages: u32,
	pub has_prev: bool,
	pub has_next: bool,
	pub prev_page: Option<u32>,
	pub next_page: Option<u32>,
}
impl PageInfo {
	pub fn build(page: u32, per_page: u32, total_count: u64) -> Self {
		let pages = (total_count.div_ceil(u64::from(per_page)) as u32).max(1);
		let has_prev = page > 1;
		let has_next = page < pages;

		Self {
			page,
			per_page,
			total_count,
			pages,
			has_prev,
			has_next,
			prev_page: has_prev.then(|| page - 1),
			next_page: has_next.then(|| page + 1),
		}
	}

	/// Offset of the first row on this page within the filtered set.
	pub fn offset(&self) -> usize {
		(self.page as usize - 1) * self.per_page as usize
	}
}

pub fn clamp_page(page: u32) -> u32 {
	page.max(1)
}

/// Out-of-range sizes fall back to the configured default rather than erroring
/// or silently serving an oversized page.
pub fn clamp_per_page(per_page: u32, default_per_page: u32, max_per_page: u32) -> u32 {
	if per_page == 0 || per_page > max_per_page { default_per_page } else { per_page }
}
