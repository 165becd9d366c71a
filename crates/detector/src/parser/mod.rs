//! 레코드 파싱 모듈 -- CSV 행을 [`Record`]로 정규화합니다.
//!
//! [`RecordReader`]는 `std::io::Read` 입력을 소유하고 레코드를 하나씩 지연 생성합니다.
//! 헤더 행은 필수이며 처음 한 번만 읽습니다. 모든 데이터 행은 정확히
//! [`COLUMN_COUNT`]개의 필드를 가져야 합니다.
//!
//! 잘못된 행은 치명적 에러입니다. 에러에는 1부터 시작하는 줄 번호가 포함되며,
//! 에러 이후에는 더 이상 레코드를 생성하지 않습니다.
//!
//! # 사용 예시
//! ```ignore
//! use procwatch_detector::parser::RecordReader;
//!
//! let file = std::fs::File::open("exec.csv")?;
//! for record in RecordReader::new(file) {
//!     let record = record?;
//!     println!("{record}");
//! }
//! ```

pub mod fields;

use std::io::Read;

use csv::StringRecord;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use procwatch_core::types::Record;

use crate::error::DetectorError;

pub use fields::{decode_command, parse_int, parse_timestamp, query_unescape};

/// 입력 행의 필드 수
pub const COLUMN_COUNT: usize = 16;

/// 입력 열 이름 (위치 순서)
pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "id",
    "timestamp",
    "cmdline",
    "username",
    "exit_code",
    "ppid",
    "pid",
    "auid",
    "uid",
    "gid",
    "euid",
    "suid",
    "fsuid",
    "egid",
    "sgid",
    "fsgid",
];

const COL_TIMESTAMP: usize = 1;
const COL_CMDLINE: usize = 2;
const COL_USERNAME: usize = 3;

/// CSV 레코드 판독기
///
/// 헤더를 첫 호출 시 소비하고, 이후 데이터 행마다 `Record`를 반환합니다.
pub struct RecordReader<R: Read> {
    reader: csv::Reader<R>,
    row: StringRecord,
    header_checked: bool,
    finished: bool,
    records_read: u64,
}

impl<R: Read> RecordReader<R> {
    /// 입력 스트림으로 판독기를 생성합니다.
    pub fn new(input: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(input);
        Self {
            reader,
            row: StringRecord::new(),
            header_checked: false,
            finished: false,
            records_read: 0,
        }
    }

    /// 지금까지 생성한 레코드 수
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// 다음 레코드를 읽습니다. 입력 끝이면 `Ok(None)`을 반환합니다.
    pub fn next_record(&mut self) -> Result<Option<Record>, DetectorError> {
        if !self.header_checked {
            self.check_header()?;
            self.header_checked = true;
        }

        if !self.reader.read_record(&mut self.row)? {
            return Ok(None);
        }

        let line = self.row.position().map_or(0, |pos| pos.line());
        let record = parse_row(&self.row, line)?;
        self.records_read += 1;
        Ok(Some(record))
    }

    /// 레코드를 채널로 전달하는 파서 단계를 실행합니다.
    ///
    /// 동기 I/O를 수행하므로 블로킹 스레드에서 호출해야 합니다.
    /// 입력 끝에 도달하면 송신자를 닫고 읽은 레코드 수를 반환합니다.
    pub fn run(mut self, tx: mpsc::Sender<Record>) -> Result<u64, DetectorError> {
        info!("parser stage started");
        loop {
            let record = match self.next_record() {
                Ok(Some(record)) => record,
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, "parser stage failed");
                    return Err(e);
                }
            };
            if tx.blocking_send(record).is_err() {
                return Err(DetectorError::Channel(
                    "record receiver closed".to_owned(),
                ));
            }
        }
        info!(records = self.records_read, "finished reading log records");
        Ok(self.records_read)
    }

    fn check_header(&mut self) -> Result<(), DetectorError> {
        let header = self.reader.headers()?;
        if header.is_empty() {
            return Err(DetectorError::Parse {
                line: 1,
                reason: "missing header row".to_owned(),
            });
        }
        if header.len() != COLUMN_COUNT {
            return Err(DetectorError::Parse {
                line: 1,
                reason: format!(
                    "wrong column count in header: expected {COLUMN_COUNT}, found {}",
                    header.len()
                ),
            });
        }
        debug!(columns = header.len(), "header row consumed");
        Ok(())
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Record, DetectorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// CSV 데이터 행 하나를 `Record`로 변환합니다.
///
/// `line`은 에러 메시지에 사용되는 1부터 시작하는 줄 번호입니다.
pub fn parse_row(row: &StringRecord, line: u64) -> Result<Record, DetectorError> {
    let fail = |reason: String| DetectorError::Parse { line, reason };

    if row.len() != COLUMN_COUNT {
        return Err(fail(format!(
            "wrong column count: expected {COLUMN_COUNT}, found {}",
            row.len()
        )));
    }

    let field = |idx: usize| row.get(idx).unwrap_or_default();
    let int = |idx: usize| parse_int(field(idx), COLUMNS[idx]).map_err(fail);

    let timestamp = parse_timestamp(field(COL_TIMESTAMP)).map_err(fail)?;
    let cmdline = decode_command(field(COL_CMDLINE)).map_err(fail)?;

    Ok(Record {
        id: int(0)?,
        timestamp,
        cmdline,
        username: field(COL_USERNAME).to_owned(),
        exit_code: int(4)?,
        ppid: int(5)?,
        pid: int(6)?,
        auid: int(7)?,
        uid: int(8)?,
        gid: int(9)?,
        euid: int(10)?,
        suid: int(11)?,
        fsuid: int(12)?,
        egid: int(13)?,
        sgid: int(14)?,
        fsgid: int(15)?,
    })
}
