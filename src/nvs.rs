use esp_idf_svc::nvs::{EspDefaultNvs, EspNvs, EspNvsPartition, NvsDefault};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};

static NV_STORE: Mutex<Option<EspNvs<NvsDefault>>> = Mutex::new(None);
const NV_STORE_MAX: usize = 512; // Config is small

// JSON values in a single NVS namespace
pub struct NVStore(());

impl NVStore {
    pub fn init(nvs_partition: EspNvsPartition<NvsDefault>, namespace: &str) -> anyhow::Result<()> {
        let mut nvs = Self::lock()?;
        *nvs = Some(EspDefaultNvs::new(nvs_partition, namespace, true)?);
        log::info!("NV_STORE: namespace={namespace}");
        Ok(())
    }

    fn lock() -> anyhow::Result<MutexGuard<'static, Option<EspNvs<NvsDefault>>>> {
        NV_STORE
            .lock()
            .map_err(|_| anyhow::anyhow!("NV_STORE lock poisoned"))
    }

    pub fn get<T>(key: &str) -> anyhow::Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let nvs = Self::lock()?;
        let nvs = nvs
            .as_ref()
            .ok_or(anyhow::anyhow!("NV_STORE not initialized"))?;
        let mut buf = [0_u8; NV_STORE_MAX];
        match nvs.get_raw(key, &mut buf)? {
            Some(data) => Ok(Some(serde_json::from_slice(data)?)),
            None => Ok(None),
        }
    }

    pub fn set<T>(key: &str, value: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let mut nvs = Self::lock()?;
        let nvs = nvs
            .as_mut()
            .ok_or(anyhow::anyhow!("NV_STORE not initialized"))?;
        let data = serde_json::to_vec(value)?;
        nvs.set_raw(key, data.as_slice())
            .map_err(|e| anyhow::anyhow!("Error updating key {key}: [{}]", e))?;
        Ok(())
    }
}
