export![hdr, mesh];
