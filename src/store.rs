use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::limits::MAX_RECORD_BYTES;
use crate::model::Code;

/// A fixed-shape entity persisted in a [`RecordStore`].
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Unique key within the store.
    fn code(&self) -> Code;
}

/// Encode a single record to [len][bincode][crc32] format.
fn encode_record<R: Record>(writer: &mut impl Write, record: &R) -> io::Result<()> {
    let payload =
        bincode::serialize(record).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let len = payload.len() as u32;
    let crc = crc32fast::hash(&payload);
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&payload)?;
    writer.write_all(&crc.to_le_bytes())?;
    Ok(())
}

/// Read the next frame, returning the record and the frame's size in bytes.
/// `Ok(None)` on end of store, including a truncated or corrupt trailing
/// frame left behind by a crash mid-append.
fn decode_record<R: Record>(reader: &mut impl Read, path: &Path) -> io::Result<Option<(R, u64)>> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }
    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_RECORD_BYTES {
        warn!("{}: implausible record length {len}, ignoring the rest of the store", path.display());
        return Ok(None);
    }

    let mut payload = vec![0u8; len];
    match reader.read_exact(&mut payload) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            warn!("{}: truncated record at end of store", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e),
    }

    let mut crc_buf = [0u8; 4];
    match reader.read_exact(&mut crc_buf) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            warn!("{}: truncated record at end of store", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e),
    }
    if u32::from_le_bytes(crc_buf) != crc32fast::hash(&payload) {
        warn!("{}: checksum mismatch, ignoring the rest of the store", path.display());
        return Ok(None);
    }

    match bincode::deserialize::<R>(&payload) {
        Ok(record) => Ok(Some((record, 8 + len as u64))),
        Err(e) => {
            warn!("{}: undecodable record ({e}), ignoring the rest of the store", path.display());
            Ok(None)
        }
    }
}

/// Flat store of framed records, one file per entity type.
///
/// Format per entry: `[u32: len][bincode: R][u32: crc32]`. No header, no
/// index. The handle only remembers the path; each operation opens the file,
/// uses it and closes it before returning.
pub struct RecordStore<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for RecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _record: PhantomData,
        }
    }
}

impl<R> fmt::Debug for RecordStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore").field("path", &self.path).finish()
    }
}

impl<R: Record> RecordStore<R> {
    /// Bind a store to `path`. The file is created lazily by the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a single record and fsync. A torn tail is cut off first so the
    /// new frame lands right after the last valid one.
    pub fn append(&self, record: &R) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&self.path)?;
        let valid = self.valid_len()?;
        let actual = file.metadata()?.len();
        if actual > valid {
            warn!(
                "{}: discarding {} bytes of torn tail before append",
                self.path.display(),
                actual - valid
            );
            file.set_len(valid)?;
        }
        file.seek(SeekFrom::Start(valid))?;
        let mut writer = BufWriter::new(file);
        encode_record(&mut writer, record)?;
        writer.flush()?;
        writer.get_ref().sync_all()
    }

    /// Byte offset just past the last frame a scan would yield.
    fn valid_len(&self) -> io::Result<u64> {
        let mut reader = match File::open(&self.path) {
            Ok(f) => BufReader::new(f),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };
        let mut len = 0;
        while let Some((_, frame_len)) = decode_record::<R>(&mut reader, &self.path)? {
            len += frame_len;
        }
        Ok(len)
    }

    /// Lazy pass over every record in insertion order. An absent store scans
    /// as empty. Call again to restart.
    pub fn scan(&self) -> io::Result<Records<R>> {
        let reader = match File::open(&self.path) {
            Ok(f) => Some(BufReader::new(f)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };
        Ok(Records {
            reader,
            path: self.path.clone(),
            _record: PhantomData,
        })
    }

    pub fn load_all(&self) -> io::Result<Vec<R>> {
        self.scan()?.collect()
    }

    /// First record in store order matching `pred`.
    pub fn find(&self, mut pred: impl FnMut(&R) -> bool) -> io::Result<Option<R>> {
        for record in self.scan()? {
            let record = record?;
            if pred(&record) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    pub fn find_by_code(&self, code: Code) -> io::Result<Option<R>> {
        self.find(|r| r.code() == code)
    }

    /// `max(code) + 1`, or 1 for an empty or absent store.
    pub fn next_code(&self) -> io::Result<Code> {
        let mut max = 0;
        for record in self.scan()? {
            max = max.max(record?.code());
        }
        Ok(max + 1)
    }

    /// Replace the first record matching `pred` with `replacement` and
    /// rewrite the whole store. Returns false, leaving the file untouched,
    /// when nothing matches.
    pub fn find_and_replace(
        &self,
        pred: impl FnMut(&R) -> bool,
        replacement: R,
    ) -> io::Result<bool> {
        let mut records = self.load_all()?;
        let Some(pos) = records.iter().position(pred) else {
            return Ok(false);
        };
        records[pos] = replacement;
        self.rewrite(&records)?;
        Ok(true)
    }

    /// Write every record to a temp file, fsync, then rename it over the
    /// store. A crash leaves either the old or the new file, never a mix.
    fn rewrite(&self, records: &[R]) -> io::Result<()> {
        let start = Instant::now();
        let tmp_path = self.tmp_path();
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            for record in records {
                encode_record(&mut writer, record)?;
            }
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        metrics::histogram!(crate::observability::STORE_REWRITE_RECORDS).record(records.len() as f64);
        metrics::histogram!(crate::observability::STORE_REWRITE_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
        debug!("rewrote {} ({} records)", self.path.display(), records.len());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

/// Iterator returned by [`RecordStore::scan`]. Yields at most one `Err`,
/// after which it is exhausted.
pub struct Records<R> {
    reader: Option<BufReader<File>>,
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Iterator for Records<R> {
    type Item = io::Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        match decode_record(reader, &self.path) {
            Ok(Some((record, _))) => Some(Ok(record)),
            Ok(None) => {
                self.reader = None;
                None
            }
            Err(e) => {
                self.reader = None;
                Some(Err(e))
            }
        }
    }
}
