use crate::store::{ScanPage, StoreResult};
use super::error::{MigrationError, MigrationResult};

/// 游标扫描的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// 还有下一页，值为下一次提交的游标
    More(u64),
    /// 服务端返回了游标 0
    Exhausted,
}

/// 基于游标的分页扫描状态机，用于键空间扫描和单个哈希的字段扫描
///
/// 唯一的结束条件是服务端返回游标 0；为防止服务端始终不返回 0，
/// 超过 `max_rounds` 轮后返回 [`MigrationError::ScanRoundLimit`]。
#[derive(Debug)]
pub struct CursorScan {
    scope: String,
    state: ScanState,
    rounds: u64,
    max_rounds: u64,
}

impl CursorScan {
    pub fn new(scope: impl Into<String>, max_rounds: u64) -> Self {
        Self {
            scope: scope.into(),
            state: ScanState::More(0),
            rounds: 0,
            max_rounds,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// 取下一页。扫描已结束时返回 `Ok(None)`。
    ///
    /// `fetch` 失败时状态保持不变，调用方决定是否放弃扫描。
    pub fn next_page<T, F>(&mut self, fetch: F) -> MigrationResult<Option<Vec<T>>>
    where
        F: FnOnce(u64) -> StoreResult<ScanPage<T>>,
    {
        let cursor = match self.state {
            ScanState::More(cursor) => cursor,
            ScanState::Exhausted => return Ok(None),
        };

        if self.rounds >= self.max_rounds {
            return Err(MigrationError::ScanRoundLimit {
                scope: self.scope.clone(),
                rounds: self.rounds,
            });
        }

        let page = fetch(cursor)?;
        self.rounds += 1;
        self.state = match page.cursor {
            0 => ScanState::Exhausted,
            next => ScanState::More(next),
        };
        Ok(Some(page.items))
    }
}
