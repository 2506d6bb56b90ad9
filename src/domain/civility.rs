#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Civility {
    Mr,
    Mrs,
    Miss,
}

impl Civility {
    pub fn code(&self) -> i32 {
        match self {
            Civility::Mr => 0,
            Civility::Mrs => 1,
            Civility::Miss => 2,
        }
    }

    pub fn from_code(code: i32) -> Result<Civility, String> {
        match code {
            0 => Ok(Civility::Mr),
            1 => Ok(Civility::Mrs),
            2 => Ok(Civility::Miss),
            _ => Err(format!("{} is not a valid civility", code)),
        }
    }
}
