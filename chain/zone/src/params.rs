use taiyi_store::ZoneType;

/// The "tiandao properties" collaborator `spec.md` §4.5 reads
/// `max_connections[from.type]` from: a per-zone-type degree cap.
/// Indexed by `ZoneType as usize`; includes a slot for `ZoneType::Invalid`
/// (always 0, since an invalid-typed zone can never exist in the store).
#[derive(Debug, Clone, Copy)]
pub struct ZoneParams {
    max_connections: [u32; 25],
}

impl ZoneParams {
    pub fn new(mut max_connections: [u32; 25]) -> Self {
        max_connections[ZoneType::Invalid as usize] = 0;
        Self { max_connections }
    }

    pub fn max_connections(&self, zone_type: ZoneType) -> u32 {
        self.max_connections[zone_type as usize]
    }
}

impl Default for ZoneParams {
    /// A generous flat cap; genesis configuration is expected to override
    /// this per zone type.
    fn default() -> Self {
        Self::new([8; 25])
    }
}
