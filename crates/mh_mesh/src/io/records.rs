// crates/mh_mesh/src/io/records.rs

//! 文本格式的逐行读取与字段解析

use crate::error::{MeshError, MeshResult};
use std::io::{BufRead, Lines};
use std::str::SplitWhitespace;

/// 按文件声明的记录数预分配时的上限，超出部分随读取增长
const MAX_PREALLOCATED_RECORDS: usize = 1 << 20;

/// 文件声明的记录数不可信，预分配容量取其与上限的较小值
pub(crate) fn capacity_hint(count: usize) -> usize {
    count.min(MAX_PREALLOCATED_RECORDS)
}

/// 带行号的行读取器
pub(crate) struct RecordReader<R> {
    lines: Lines<R>,
    line_no: usize,
    format: &'static str,
}

impl<R: BufRead> RecordReader<R> {
    pub(crate) fn new(reader: R, format: &'static str) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            format,
        }
    }

    /// 下一行，文件结束时为 `None`
    pub(crate) fn next_line(&mut self) -> MeshResult<Option<String>> {
        match self.lines.next() {
            None => Ok(None),
            Some(line) => {
                self.line_no += 1;
                Ok(Some(line?))
            }
        }
    }

    /// 下一行，文件结束视为格式错误
    pub(crate) fn expect_line(&mut self, what: &str) -> MeshResult<String> {
        match self.next_line()? {
            Some(line) => Ok(line),
            None => Err(MeshError::malformed(
                self.format,
                self.line_no + 1,
                format!("文件提前结束, 缺少{what}"),
            )),
        }
    }

    /// 读取下一行并解析行首整数，行内其余内容（注释）忽略
    pub(crate) fn leading_usize(&mut self, what: &str) -> MeshResult<usize> {
        let line = self.expect_line(what)?;
        self.fields(&line).next_usize(what)
    }

    /// 当前行的字段解析器
    pub(crate) fn fields<'a>(&self, line: &'a str) -> Fields<'a> {
        Fields {
            tokens: line.split_whitespace(),
            format: self.format,
            line: self.line_no,
        }
    }

    /// 当前行的格式错误
    pub(crate) fn error(&self, message: impl Into<String>) -> MeshError {
        MeshError::malformed(self.format, self.line_no, message)
    }
}

/// 按空白分隔的字段
pub(crate) struct Fields<'a> {
    tokens: SplitWhitespace<'a>,
    format: &'static str,
    line: usize,
}

impl<'a> Fields<'a> {
    fn token(&mut self, what: &str) -> MeshResult<&'a str> {
        self.tokens
            .next()
            .ok_or_else(|| MeshError::malformed(self.format, self.line, format!("缺少字段 {what}")))
    }

    fn invalid(&self, what: &str, token: &str) -> MeshError {
        MeshError::malformed(self.format, self.line, format!("{what} 无法解析: '{token}'"))
    }

    /// 下一个原始字段
    pub(crate) fn next_str(&mut self, what: &str) -> MeshResult<&'a str> {
        self.token(what)
    }

    pub(crate) fn next_usize(&mut self, what: &str) -> MeshResult<usize> {
        let token = self.token(what)?;
        token.parse().map_err(|_| self.invalid(what, token))
    }

    pub(crate) fn next_i32(&mut self, what: &str) -> MeshResult<i32> {
        let token = self.token(what)?;
        token.parse().map_err(|_| self.invalid(what, token))
    }

    /// 浮点字段，接受 Fortran 的 `D` 指数写法
    pub(crate) fn next_f64(&mut self, what: &str) -> MeshResult<f64> {
        let token = self.token(what)?;
        parse_f64(token).ok_or_else(|| self.invalid(what, token))
    }

    /// 可缺省的浮点字段
    pub(crate) fn next_f64_or(&mut self, what: &str, default: f64) -> MeshResult<f64> {
        match self.tokens.next() {
            None => Ok(default),
            Some(token) => parse_f64(token).ok_or_else(|| self.invalid(what, token)),
        }
    }
}

fn parse_f64(token: &str) -> Option<f64> {
    token
        .parse()
        .ok()
        .or_else(|| token.replace(['D', 'd'], "E").parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_and_line_numbers() {
        let text = "first\n  12  3.5  1.0D+02 \n";
        let mut reader = RecordReader::new(text.as_bytes(), "TEST");
        assert_eq!(reader.expect_line("标题").unwrap(), "first");
        let line = reader.expect_line("数据").unwrap();
        let mut f = reader.fields(&line);
        assert_eq!(f.next_usize("a").unwrap(), 12);
        assert_eq!(f.next_f64("b").unwrap(), 3.5);
        assert_eq!(f.next_f64("c").unwrap(), 100.0);
        assert_eq!(f.next_f64_or("d", -1.0).unwrap(), -1.0);
        let err = f.next_usize("e").unwrap_err();
        assert!(matches!(err, MeshError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_unexpected_eof() {
        let mut reader = RecordReader::new("".as_bytes(), "TEST");
        assert!(reader.next_line().unwrap().is_none());
        let err = reader.expect_line("标题").unwrap_err();
        assert!(matches!(err, MeshError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_leading_usize_ignores_comment() {
        let mut reader = RecordReader::new("3 ! NOPE\nx\n".as_bytes(), "TEST");
        assert_eq!(reader.leading_usize("开边界数").unwrap(), 3);
        assert!(reader.leading_usize("节点数").is_err());
    }
}
