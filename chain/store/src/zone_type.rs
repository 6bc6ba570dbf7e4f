/// The fixed, ordered list of 24 zone-type tokens (`spec.md` §4.5). An
/// out-of-range or unrecognized type string maps to `Invalid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ZoneType {
    Yuanye,
    Hupo,
    Nongtian,
    Lindi,
    Milin,
    Yuanlin,
    Shanyue,
    Dongxue,
    Shilin,
    Qiulin,
    Taoyuan,
    Sangyuan,
    Xiagu,
    Zaoze,
    Yaoyuan,
    Haiyang,
    Shamo,
    Huangye,
    Anyuan,
    Duhui,
    Menpai,
    Shizhen,
    Guansai,
    Cunzhuang,
    Invalid,
}

impl ZoneType {
    pub const ALL: [ZoneType; 24] = [
        ZoneType::Yuanye,
        ZoneType::Hupo,
        ZoneType::Nongtian,
        ZoneType::Lindi,
        ZoneType::Milin,
        ZoneType::Yuanlin,
        ZoneType::Shanyue,
        ZoneType::Dongxue,
        ZoneType::Shilin,
        ZoneType::Qiulin,
        ZoneType::Taoyuan,
        ZoneType::Sangyuan,
        ZoneType::Xiagu,
        ZoneType::Zaoze,
        ZoneType::Yaoyuan,
        ZoneType::Haiyang,
        ZoneType::Shamo,
        ZoneType::Huangye,
        ZoneType::Anyuan,
        ZoneType::Duhui,
        ZoneType::Menpai,
        ZoneType::Shizhen,
        ZoneType::Guansai,
        ZoneType::Cunzhuang,
    ];

    /// Maps the wire token to a `ZoneType`; anything unrecognized is
    /// `Invalid` rather than an error, matching `spec.md` §4.5 ("an
    /// out-of-range type maps to `INVALID`").
    pub fn from_token(token: &str) -> ZoneType {
        match token {
            "YUANYE" => ZoneType::Yuanye,
            "HUPO" => ZoneType::Hupo,
            "NONGTIAN" => ZoneType::Nongtian,
            "LINDI" => ZoneType::Lindi,
            "MILIN" => ZoneType::Milin,
            "YUANLIN" => ZoneType::Yuanlin,
            "SHANYUE" => ZoneType::Shanyue,
            "DONGXUE" => ZoneType::Dongxue,
            "SHILIN" => ZoneType::Shilin,
            "QIULIN" => ZoneType::Qiulin,
            "TAOYUAN" => ZoneType::Taoyuan,
            "SANGYUAN" => ZoneType::Sangyuan,
            "XIAGU" => ZoneType::Xiagu,
            "ZAOZE" => ZoneType::Zaoze,
            "YAOYUAN" => ZoneType::Yaoyuan,
            "HAIYANG" => ZoneType::Haiyang,
            "SHAMO" => ZoneType::Shamo,
            "HUANGYE" => ZoneType::Huangye,
            "ANYUAN" => ZoneType::Anyuan,
            "DUHUI" => ZoneType::Duhui,
            "MENPAI" => ZoneType::Menpai,
            "SHIZHEN" => ZoneType::Shizhen,
            "GUANSAI" => ZoneType::Guansai,
            "CUNZHUANG" => ZoneType::Cunzhuang,
            _ => ZoneType::Invalid,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, ZoneType::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_token_is_invalid() {
        assert_eq!(ZoneType::from_token("NOT-A-ZONE"), ZoneType::Invalid);
    }

    #[test]
    fn all_24_tokens_round_trip() {
        let tokens = [
            "YUANYE", "HUPO", "NONGTIAN", "LINDI", "MILIN", "YUANLIN", "SHANYUE", "DONGXUE",
            "SHILIN", "QIULIN", "TAOYUAN", "SANGYUAN", "XIAGU", "ZAOZE", "YAOYUAN", "HAIYANG",
            "SHAMO", "HUANGYE", "ANYUAN", "DUHUI", "MENPAI", "SHIZHEN", "GUANSAI", "CUNZHUANG",
        ];
        assert_eq!(tokens.len(), ZoneType::ALL.len());
        for (token, expected) in tokens.iter().zip(ZoneType::ALL.iter()) {
            assert_eq!(ZoneType::from_token(token), *expected);
        }
    }
}
